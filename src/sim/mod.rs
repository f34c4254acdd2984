pub mod attach;
pub mod ground;
pub mod roasting;
pub mod scoring;
pub mod session;
pub mod spawner;
pub mod stack;
pub mod tick;
pub mod timer;
