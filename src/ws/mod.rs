mod hub;

pub use hub::WsHub;
