//! Sparse register storage
//!
//! [`RegisterStore`] maps 8-bit register addresses to 8-bit values. Registers
//! that were never written read as 0 and are not materialized. The store is
//! not synchronized; backends put it behind their own lock.

use std::collections::BTreeMap;

/// Number of addressable registers
pub const REGISTER_SPACE: usize = 256;

/// Register address `offset` places after `start`, wrapping at 0xFF
pub fn wrapping_register(start: u8, offset: usize) -> u8 {
    ((start as usize + offset) % REGISTER_SPACE) as u8
}

/// Sparse register map owned by a single device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterStore {
    registers: BTreeMap<u8, u8>,
}

impl RegisterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `initial` register values
    pub fn with_values(initial: impl IntoIterator<Item = (u8, u8)>) -> Self {
        Self {
            registers: initial.into_iter().collect(),
        }
    }

    /// Value of `reg`, or 0 if it was never written
    pub fn get(&self, reg: u8) -> u8 {
        self.registers.get(&reg).copied().unwrap_or(0)
    }

    /// Set `reg` to `value`
    pub fn set(&mut self, reg: u8, value: u8) {
        self.registers.insert(reg, value);
    }

    /// Read `count` registers starting at `start`, wrapping at 0xFF
    pub fn read_span(&self, start: u8, count: usize) -> Vec<u8> {
        (0..count)
            .map(|i| self.get(wrapping_register(start, i)))
            .collect()
    }

    /// Write `data` to registers starting at `start`, wrapping at 0xFF
    ///
    /// Spans longer than the register space overwrite earlier bytes of the
    /// same call; the last byte written to a register wins.
    pub fn write_span(&mut self, start: u8, data: &[u8]) {
        for (i, &value) in data.iter().enumerate() {
            self.set(wrapping_register(start, i), value);
        }
    }

    /// Number of registers that have been written
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Whether no register has been written
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Iterate over written registers in address order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.registers.iter().map(|(&reg, &value)| (reg, value))
    }

    /// Copy of every written register
    pub fn snapshot(&self) -> BTreeMap<u8, u8> {
        self.registers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_reads_zero() {
        let store = RegisterStore::new();
        assert_eq!(store.get(0x10), 0);
        assert_eq!(store.read_span(0xF0, 4), vec![0, 0, 0, 0]);
        // Reads never materialize entries
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_get() {
        let mut store = RegisterStore::new();
        store.set(0x10, 0x55);
        store.set(0x10, 0x56);
        assert_eq!(store.get(0x10), 0x56);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_wrapping_register() {
        assert_eq!(wrapping_register(0x10, 0), 0x10);
        assert_eq!(wrapping_register(0xFF, 1), 0x00);
        assert_eq!(wrapping_register(0xFE, 3), 0x01);
        assert_eq!(wrapping_register(0x00, 256), 0x00);
        assert_eq!(wrapping_register(0x80, 300), 0xAC);
    }

    #[test]
    fn test_span_wraparound() {
        let mut store = RegisterStore::new();
        store.write_span(0xFE, &[1, 2, 3]);
        assert_eq!(store.get(0xFE), 1);
        assert_eq!(store.get(0xFF), 2);
        assert_eq!(store.get(0x00), 3);
        assert_eq!(store.read_span(0xFE, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_span_longer_than_register_space() {
        let mut store = RegisterStore::new();
        let data: Vec<u8> = (0..=257u16).map(|i| (i % 7) as u8).collect();
        store.write_span(0x00, &data);

        assert_eq!(store.len(), REGISTER_SPACE);
        // Bytes 256 and 257 land on registers 0x00 and 0x01 again
        assert_eq!(store.get(0x00), (256 % 7) as u8);
        assert_eq!(store.get(0x01), (257 % 7) as u8);
        assert_eq!(store.get(0x02), 2);
    }

    #[test]
    fn test_iter_in_address_order() {
        let store = RegisterStore::with_values([(0x30, 3), (0x10, 1), (0x20, 2)]);
        let regs: Vec<(u8, u8)> = store.iter().collect();
        assert_eq!(regs, vec![(0x10, 1), (0x20, 2), (0x30, 3)]);
        assert_eq!(store.snapshot().len(), 3);
    }
}
