//! Memory-mapped file backend.
//!
//! [`Physical`] maps a `.winmd` (or the PE image that carries it) into the address space
//! with `memmap2`, so heaps and tables are read straight from the page cache.

use super::Backend;
use crate::Result;

use memmap2::Mmap;
use std::{fs, path::Path};

/// A file on disk, mapped read-only.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Open and map the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;

        // The mapping stays valid for as long as `Physical` lives; the file is never
        // written through this process.
        let mmap = unsafe { Mmap::map(&file) }?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn physical() {
        let path = std::env::temp_dir().join(format!("winmdscope-physical-{}", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(&[0x42, 0x53, 0x4A, 0x42, 0x01]).unwrap();
        }

        let physical = Physical::new(&path).unwrap();
        assert_eq!(physical.len(), 5);
        assert_eq!(physical.data_slice(0, 4).unwrap(), &[0x42, 0x53, 0x4A, 0x42]);
        assert!(physical.data_slice(4, 2).is_err());

        drop(physical);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file() {
        let result = Physical::new("/definitely/not/here.winmd");
        assert!(matches!(result, Err(crate::Error::FileError(_))));
    }
}
