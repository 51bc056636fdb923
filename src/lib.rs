pub mod buf;
pub mod device;
pub mod error;
pub mod raw;
pub mod transport;


pub use buf::PacketBuf;
pub use device::{Device, Tun};
pub use error::{Error, Result};
pub use transport::Udp;
