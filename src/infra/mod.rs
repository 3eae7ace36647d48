pub mod network;
pub mod player;
