pub mod error;
pub mod time;
pub mod frame;
pub mod coord;
pub mod normalize;
pub mod crop;
pub mod stack;
pub mod io;
pub mod source;
pub mod pipeline;
