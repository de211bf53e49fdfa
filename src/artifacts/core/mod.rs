//! Shared plumbing used across commands

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// `std::io::Write` adapter over the minus pager.
///
/// Commands write to a `Box<dyn Write>` without knowing where the text
/// goes; handing them one of these routes long output (like `log`) through
/// the pager. The caller keeps a clone of the `Pager` and runs
/// `minus::page_all` after the command returns.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
