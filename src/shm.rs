//! Read-only mapping of the simulator's telemetry page
//!
//! The simulator owns the POSIX shared memory page and rewrites it in place
//! while telemetry output is enabled. This side only opens and maps it:
//! never creates, never truncates, never unlinks.

use crate::error::{Result, TelemetryError};
use rustix::fd::OwnedFd;
use rustix::mm::{mmap, munmap, MapFlags, ProtFlags};
use rustix::shm::{shm_open, Mode, ShmOFlags};
use std::ffi::CString;
use std::ptr::NonNull;

/// Name of the physics page as exposed on POSIX systems
pub const PHYSICS_PAGE: &str = "acpmf_physics";

/// Handle to the mapped telemetry page
#[derive(Debug)]
pub struct TelemetryPage {
    #[allow(dead_code)]
    fd: OwnedFd,
    addr: NonNull<u8>,
    len: usize,
    name: String,
}

// SAFETY: the mapping is read-only and lives as long as the handle
unsafe impl Send for TelemetryPage {}
unsafe impl Sync for TelemetryPage {}

impl TelemetryPage {
    /// Open an existing page read-only and map `len` bytes of it
    ///
    /// `len` is the active layout's byte size; the page must hold at least
    /// that much. Fails if the simulator is not running or has not created
    /// the page yet.
    pub fn open(name: &str, len: usize) -> Result<Self> {
        let c_name = CString::new(format!("/{name}")).unwrap();

        let fd = shm_open(c_name.as_c_str(), ShmOFlags::RDONLY, Mode::empty()).map_err(|e| {
            TelemetryError::ShmOpen {
                name: name.to_string(),
                source: e.into(),
            }
        })?;

        let stat = rustix::fs::fstat(&fd).map_err(|e| TelemetryError::ShmOpen {
            name: name.to_string(),
            source: e.into(),
        })?;
        let page_len = stat.st_size as usize;
        if page_len < len {
            return Err(TelemetryError::ShmSize {
                name: name.to_string(),
                expected: len,
                got: page_len,
            });
        }

        let addr = unsafe {
            mmap(
                std::ptr::null_mut(),
                len,
                ProtFlags::READ,
                MapFlags::SHARED,
                &fd,
                0,
            )
            .map_err(|e| TelemetryError::Mmap(e.into()))?
        };

        let addr = NonNull::new(addr.cast::<u8>()).expect("mmap returned null");

        Ok(Self {
            fd,
            addr,
            len,
            name: name.to_string(),
        })
    }

    /// Copy the current record out of the page into `buf`
    ///
    /// Returns the number of bytes copied. One call per polling tick gives
    /// the decoder a buffer the simulator is no longer writing through.
    pub fn read_record(&self, buf: &mut [u8]) -> usize {
        let n = self.len.min(buf.len());
        unsafe {
            std::ptr::copy_nonoverlapping(self.addr.as_ptr(), buf.as_mut_ptr(), n);
        }
        n
    }

    /// Mapped length in bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Name of the page
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TelemetryPage {
    fn drop(&mut self) {
        // Unmap only; the simulator owns the page
        unsafe {
            let _ = munmap(self.addr.as_ptr().cast(), self.len);
        }
    }
}
