//! CAT Serial Port
//!
//! Adapts a blocking `embedded-io` UART to [`SerialPort`]. Received bytes
//! are drained into a fixed ring on every poll, so the CAT engine can ask
//! how many bytes are waiting without blocking.

use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;

use crate::config::CAT_RX_BUFFER_SIZE;
use crate::hal::SerialPort;

/// Buffered CAT port
pub struct CatUart<U> {
    uart: U,
    rx: Deque<u8, CAT_RX_BUFFER_SIZE>,
}

impl<U: Read + ReadReady + Write> CatUart<U> {
    /// Wrap an initialized UART
    #[must_use]
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            rx: Deque::new(),
        }
    }

    /// Move whatever the UART holds into the ring
    pub fn poll(&mut self) {
        let mut chunk = [0u8; 16];
        while matches!(self.uart.read_ready(), Ok(true)) {
            let free = self.rx.capacity() - self.rx.len();
            if free == 0 {
                warn!("CAT: receive ring full");
                return;
            }
            let want = free.min(chunk.len());
            match self.uart.read(&mut chunk[..want]) {
                Ok(0) => return,
                Ok(n) => {
                    for &byte in &chunk[..n] {
                        // capacity checked above
                        let _ = self.rx.push_back(byte);
                    }
                }
                Err(_) => {
                    error!("CAT: UART read error");
                    return;
                }
            }
        }
    }
}

impl<U: Read + ReadReady + Write> SerialPort for CatUart<U> {
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.uart.write_all(bytes).is_err() {
            error!("CAT: UART write error");
        }
    }
}
