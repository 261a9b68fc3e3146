//! Hit flash on foreign page elements
//!
//! A flash overwrites a few inline style properties and must put back exactly
//! what was there before. Overlapping flashes on the same element share one
//! saved copy of the original values, which is restored when the last of them
//! runs out.

/// Inline style properties a flash overwrites, with their flash values
pub const FLASH_STYLE: [(&str, &str); 3] = [
    ("filter", "blur(2px) brightness(1.5)"),
    ("transform", "scale(0.95)"),
    ("transition", "all 0.3s ease"),
];

/// Read/write access to one element's inline style.
///
/// An empty string means the property is not set inline.
pub trait InlineStyle {
    fn get(&self, name: &str) -> String;
    fn set(&mut self, name: &str, value: &str);
}

#[derive(Debug)]
struct Entry<K> {
    key: K,
    saved: Vec<String>,
    pending: u32,
}

/// Elements currently flashed, keyed by whatever identifies them on the host
#[derive(Debug)]
pub struct FlashBook<K> {
    entries: Vec<Entry<K>>,
}

impl<K> Default for FlashBook<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> FlashBook<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the flash to `style`. Each call must be matched by one
    /// [`FlashBook::release`] once its delay has run out.
    pub fn flash(&mut self, key: K, style: &mut impl InlineStyle) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            // Already flashed: the inline values are ours, keep the saved ones
            Some(entry) => entry.pending += 1,
            None => {
                let saved = FLASH_STYLE.iter().map(|(name, _)| style.get(name)).collect();
                self.entries.push(Entry {
                    key,
                    saved,
                    pending: 1,
                });
            }
        }
        for (name, value) in FLASH_STYLE {
            style.set(name, value);
        }
    }

    /// Drop one pending flash. Returns `true` when it was the last one and
    /// the original values were written back.
    pub fn release(&mut self, key: &K, style: &mut impl InlineStyle) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.key == *key) else {
            return false;
        };
        let entry = &mut self.entries[index];
        entry.pending -= 1;
        if entry.pending > 0 {
            return false;
        }

        let entry = self.entries.swap_remove(index);
        for ((name, _), value) in FLASH_STYLE.iter().zip(&entry.saved) {
            style.set(name, value);
        }
        true
    }

    pub fn is_flashing(&self, key: &K) -> bool {
        self.entries.iter().any(|e| e.key == *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
