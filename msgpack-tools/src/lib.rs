#![forbid(unsafe_code)]
/*!
 Command-line front end shared by `json2msgpack` and `msgpack2json`.
*/

pub mod app;
