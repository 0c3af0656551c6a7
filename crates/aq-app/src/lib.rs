#![no_std]

// This must go first so the logging macros are visible to the other modules.
mod fmt;

pub mod board;
pub mod tasks;
pub mod transport;

use core::ptr::addr_of_mut;
use embedded_alloc::LlffHeap;

pub const FW_VERSION: &str = env!("FW_VERSION");

// Heap backing the JSON encoder.
#[global_allocator]
pub static ALLOCATOR: LlffHeap = LlffHeap::empty();

pub fn init_heap() {
    use core::mem::MaybeUninit;
    const HEAP_SIZE: usize = 4 * 1024;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] =
        [MaybeUninit::uninit(); HEAP_SIZE];
    unsafe { ALLOCATOR.init(addr_of_mut!(HEAP_MEM) as usize, HEAP_SIZE) }
}

pub mod prelude {
    pub use super::board::{
        AirQualityBoard, Ccs811BusResources, Ccs811Resources,
    };
    pub use super::tasks::*;
    pub use super::transport::{BusError, TwimTransport};
    pub use super::{init_heap, FW_VERSION};
    pub use embassy_executor::Spawner;
    pub use embassy_time::{Delay, Duration, Timer};
}
