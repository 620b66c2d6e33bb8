pub mod huffman;
pub mod room;
pub mod websocket;
