pub mod parser;
pub mod bus;
pub mod driver;

pub use bus::SampleBus;
pub use driver::PollDriver;
