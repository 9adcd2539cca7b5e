/*!
 This module defines string helpers shared by both conversion directions.
*/

pub mod base64;
pub mod prefix;
