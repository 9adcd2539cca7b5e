/*!
 Contains logic and data structures used to read and write MessagePack data.

 ## Overview

 MessagePack is a binary serialization format with the same data model as JSON, plus raw binary
 blobs (`bin`) and application-defined extension types (`ext`). Every value starts with a marker byte
 that describes its type and, for small values, the value or length itself.

 ## Features

 - Streaming reader that works on any [`std::io::Read`] without loading the whole input
 - Writer that always picks the smallest encoding and checks container element counts
*/

pub mod models;
pub mod reader;
pub mod writer;
mod tests;
