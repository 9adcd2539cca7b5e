/*!
 Errors that can happen when reading, writing, or converting MessagePack and JSON data.
*/

pub mod conversion;
pub mod generator;
pub mod reader;
pub mod writer;
