//! Backend enablement mask
//!
//! One bit per catalog entry. A set bit means the entry is disabled, so a
//! zeroed mask (the initial state) enables every compiled-in backend.
//! The mask is only ever replaced as a whole: a restriction list either
//! resolves completely and becomes the new mask, or nothing changes.

use thiserror::Error;

use super::catalog::Catalog;

/// Errors when restricting the enabled backend set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// A requested name is not in the catalog
    #[error("Unknown audio driver '{0}'")]
    UnknownDriver(String),
}

/// Which catalog entries the factory may try
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnableMask {
    disabled: Vec<u8>,
    len: usize,
}

impl EnableMask {
    /// All-enabled mask for a catalog with `len` entries
    pub fn new(len: usize) -> Self {
        Self {
            disabled: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Number of catalog entries covered
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Enable every entry
    pub fn enable_all(&mut self) {
        self.disabled.fill(0);
    }

    /// Enable exactly the named entries and disable all others
    ///
    /// All-or-nothing: if any name is not in `catalog` the mask is left
    /// untouched. An empty list disables everything.
    pub fn set_enabled_set<S: AsRef<str>>(
        &mut self,
        catalog: &Catalog,
        names: &[S],
    ) -> Result<(), MaskError> {
        let mut next = Self::new(self.len);
        (0..self.len).for_each(|i| next.disable(i));

        for name in names {
            let name = name.as_ref();
            match catalog.position(name) {
                Some(i) if i < self.len => next.enable(i),
                _ => return Err(MaskError::UnknownDriver(name.to_string())),
            }
        }

        *self = next;
        Ok(())
    }

    /// Whether the entry at `index` may be selected
    ///
    /// Indices outside the catalog are never enabled.
    pub fn is_enabled(&self, index: usize) -> bool {
        index < self.len && self.disabled[index / 8] & (1 << (index % 8)) == 0
    }

    /// Number of enabled entries
    pub fn enabled_count(&self) -> usize {
        (0..self.len).filter(|&i| self.is_enabled(i)).count()
    }

    /// Raw packed bits (set = disabled)
    pub fn as_bytes(&self) -> &[u8] {
        &self.disabled
    }

    fn enable(&mut self, index: usize) {
        self.disabled[index / 8] &= !(1 << (index % 8));
    }

    fn disable(&mut self, index: usize) {
        self.disabled[index / 8] |= 1 << (index % 8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backends::mock::{FAIL_OK_OK, NINE};

    #[test]
    fn test_default_all_enabled() {
        let mask = EnableMask::new(3);
        assert!((0..3).all(|i| mask.is_enabled(i)));
        assert!(!mask.is_enabled(3));
        assert_eq!(mask.enabled_count(), 3);
    }

    #[test]
    fn test_every_subset_enables_exactly_its_members() {
        let catalog = Catalog::new(FAIL_OK_OK);
        let names: Vec<&str> = catalog.names().collect();

        for bits in 1u32..(1 << names.len()) {
            let subset: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, n)| *n)
                .collect();

            let mut mask = EnableMask::new(catalog.len());
            mask.set_enabled_set(&catalog, &subset).unwrap();
            for (i, name) in names.iter().enumerate() {
                assert_eq!(mask.is_enabled(i), subset.contains(name), "subset {:?}", subset);
            }

            mask.enable_all();
            assert_eq!(mask, EnableMask::new(catalog.len()));
        }
    }

    #[test]
    fn test_unknown_name_leaves_mask_untouched() {
        let catalog = Catalog::new(FAIL_OK_OK);
        let mut mask = EnableMask::new(catalog.len());
        mask.set_enabled_set(&catalog, &["b"]).unwrap();
        let before = mask.as_bytes().to_vec();

        let err = mask.set_enabled_set(&catalog, &["a", "nope"]).unwrap_err();
        assert_eq!(err, MaskError::UnknownDriver("nope".into()));
        assert_eq!(mask.as_bytes(), before.as_slice());
        assert!(mask.is_enabled(1));
        assert!(!mask.is_enabled(0));
    }

    #[test]
    fn test_spans_multiple_bytes() {
        let catalog = Catalog::new(NINE);
        let mut mask = EnableMask::new(catalog.len());
        assert_eq!(mask.as_bytes().len(), 2);

        mask.set_enabled_set(&catalog, &["n8", "n0"]).unwrap();
        assert_eq!(mask.as_bytes(), &[0xFE, 0x00]);
        assert!(mask.is_enabled(0));
        assert!(mask.is_enabled(8));
        assert_eq!(mask.enabled_count(), 2);
    }

    #[test]
    fn test_enabling_every_name_equals_fresh_mask() {
        let catalog = Catalog::new(NINE);
        let names: Vec<&str> = catalog.names().collect();
        let mut mask = EnableMask::new(catalog.len());

        mask.set_enabled_set(&catalog, &["n3"]).unwrap();
        assert_eq!(mask.as_bytes(), &[0xF7, 0x01]);

        mask.set_enabled_set(&catalog, &names).unwrap();
        assert_eq!(mask, EnableMask::new(catalog.len()));
        assert_eq!(mask.as_bytes(), &[0x00, 0x00]);
    }

    #[test]
    fn test_empty_list_disables_everything() {
        let catalog = Catalog::new(FAIL_OK_OK);
        let mut mask = EnableMask::new(catalog.len());
        mask.set_enabled_set::<&str>(&catalog, &[]).unwrap();
        assert_eq!(mask.enabled_count(), 0);
    }
}
