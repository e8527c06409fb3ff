pub mod commands;
pub mod device;
pub mod output;
pub mod packet;
pub mod properties;
