//! The owning entry point: a backend together with the view parsed from it.

use std::path::Path;

use ouroboros::self_referencing;

use crate::{
    file::{Backend, Memory, Physical},
    metadata::view::MetadataView,
    Result,
};

#[self_referencing]
/// A loaded metadata image.
///
/// Owns the input, either a memory-mapped file or a buffer, and the [`MetadataView`] that
/// borrows from it. The store is immutable after loading and can be shared between threads.
///
/// # Examples
///
/// ```rust,no_run
/// use winmdscope::{metadata::tables::TableId, MetadataStore};
///
/// let store = MetadataStore::from_file("Windows.Win32.winmd".as_ref())?;
/// println!("{} methods", store.view().row_count(TableId::MethodDef));
/// # Ok::<(), winmdscope::Error>(())
/// ```
pub struct MetadataStore {
    /// Holds the input data, either as memory buffer or memory-mapped file
    file: Box<dyn Backend>,

    #[borrows(file)]
    #[covariant]
    /// The parsed metadata, borrowing from `file`
    view: MetadataView<'this>,
}

impl MetadataStore {
    /// Map the file at `path` and parse it.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, otherwise the errors
    /// of [`MetadataView::parse`].
    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("loading {}", path.display());
        Self::load(Box::new(Physical::new(path)?))
    }

    /// Take ownership of `data` and parse it.
    ///
    /// # Errors
    /// See [`MetadataView::parse`].
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        Self::load(Box::new(Memory::new(data)))
    }

    fn load(file: Box<dyn Backend>) -> Result<Self> {
        MetadataStore::try_new(file, |file| MetadataView::parse(file.data()))
    }

    /// The parsed metadata
    #[must_use]
    pub fn view(&self) -> &MetadataView<'_> {
        self.borrow_view()
    }

    /// The complete input, including any PE headers around the metadata
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.borrow_file().data()
    }
}
