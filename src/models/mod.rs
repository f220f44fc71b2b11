mod anomaly;
mod baseline;
mod risk;
mod sample;
mod score;
mod types;
mod zone;

pub use anomaly::*;
pub use baseline::*;
pub use risk::*;
pub use sample::*;
pub use score::*;
pub use types::*;
pub use zone::*;
