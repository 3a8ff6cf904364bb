pub mod alpha;
pub mod consts;
pub mod errors;
pub mod gateway;
pub mod parser;
pub mod rest_gateway;
pub mod utils;
