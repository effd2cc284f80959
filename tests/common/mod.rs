//! Simulated CAT24C32 on an I2C bus.
//!
//! Models the parts of the device the driver relies on: a 16-bit address
//! counter loaded by the first two bytes of a write, data bytes that roll
//! over inside the current page, and reads that roll over at the end of the
//! array. Every transfer is logged so tests can inspect the exact sequence.
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use cat24c32_eeprom_rs::PAGE_SIZE;
use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

pub const BUS_ADDRESS: u8 = 0x50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Write { address: u8, bytes: Vec<u8> },
    Read { address: u8, len: usize },
}

impl Transfer {
    /// Device offset and payload length of a data write (address prefix
    /// stripped). `None` for reads and for bare address-set writes.
    pub fn data_write(&self) -> Option<(u16, usize)> {
        match self {
            Transfer::Write { bytes, .. } if bytes.len() > 2 => {
                Some((u16::from_be_bytes([bytes[0], bytes[1]]), bytes.len() - 2))
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct SimEeprom {
    pub memory: Vec<u8>,
    pub log: Vec<Transfer>,
    pointer: usize,
    writes: usize,
    reads: usize,
    /// NACK the n-th write transfer (0-based), counting from construction.
    pub fail_write: Option<usize>,
    /// NACK the n-th read transfer (0-based), counting from construction.
    pub fail_read: Option<usize>,
    /// Flip bit 0 of every byte returned at this device offset.
    pub corrupt_at: Option<u16>,
}

impl SimEeprom {
    pub fn new(page_count: usize) -> Self {
        Self::filled(page_count, 0xFF)
    }

    pub fn filled(page_count: usize, value: u8) -> Self {
        Self {
            memory: vec![value; page_count * PAGE_SIZE],
            log: Vec::new(),
            pointer: 0,
            writes: 0,
            reads: 0,
            fail_write: None,
            fail_read: None,
            corrupt_at: None,
        }
    }

    /// Transfers logged after the first `skip`.
    pub fn transfers_after(&self, skip: usize) -> &[Transfer] {
        &self.log[skip..]
    }

    pub fn data_writes(&self) -> Vec<(u16, usize)> {
        self.log.iter().filter_map(Transfer::data_write).collect()
    }

    fn do_write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ErrorKind> {
        let n = self.writes;
        self.writes += 1;
        if address != BUS_ADDRESS || self.fail_write == Some(n) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        self.log.push(Transfer::Write {
            address,
            bytes: bytes.to_vec(),
        });
        if bytes.len() < 2 {
            return Ok(());
        }
        let capacity = self.memory.len();
        let start = u16::from_be_bytes([bytes[0], bytes[1]]) as usize % capacity;
        let page = start - start % PAGE_SIZE;
        let mut column = start % PAGE_SIZE;
        for &b in &bytes[2..] {
            self.memory[page + column] = b;
            column = (column + 1) % PAGE_SIZE;
        }
        self.pointer = page + column;
        Ok(())
    }

    fn do_read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), ErrorKind> {
        let n = self.reads;
        self.reads += 1;
        if address != BUS_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if self.fail_read == Some(n) {
            return Err(ErrorKind::Bus);
        }
        self.log.push(Transfer::Read {
            address,
            len: buf.len(),
        });
        let capacity = self.memory.len();
        for slot in buf.iter_mut() {
            *slot = self.memory[self.pointer];
            if self.corrupt_at == Some(self.pointer as u16) {
                *slot ^= 0x01;
            }
            self.pointer = (self.pointer + 1) % capacity;
        }
        Ok(())
    }
}

impl ErrorType for SimEeprom {
    type Error = ErrorKind;
}

impl embedded_hal::i2c::I2c for SimEeprom {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => self.do_write(address, bytes)?,
                Operation::Read(buf) => self.do_read(address, buf)?,
            }
        }
        Ok(())
    }
}

impl embedded_hal_async::i2c::I2c for SimEeprom {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        embedded_hal::i2c::I2c::transaction(self, address, operations)
    }
}

/// Delay provider that only adds up the requested time.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    pub total_ns: Rc<Cell<u64>>,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns.get() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + ns as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns.set(self.total_ns.get() + ms as u64 * 1_000_000);
    }
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        embedded_hal::delay::DelayNs::delay_ns(self, ns)
    }

    async fn delay_ms(&mut self, ms: u32) {
        embedded_hal::delay::DelayNs::delay_ms(self, ms)
    }
}
