#![allow(dead_code)]

use std::io;

/// An in-memory writer that starts failing after accepting a number of
/// writes.
pub struct FlakyWriter {
    buf: Vec<u8>,
    remaining: usize,
}

impl FlakyWriter {
    pub fn unlimited() -> Self {
        Self::fail_after(usize::MAX)
    }

    pub fn fail_after(writes: usize) -> Self {
        Self {
            buf: Vec::new(),
            remaining: writes,
        }
    }

    #[track_caller]
    pub fn into_string(self) -> String {
        String::from_utf8(self.buf).unwrap()
    }
}

impl io::Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        }
        self.remaining -= 1;
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
