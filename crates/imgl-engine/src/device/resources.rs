use std::collections::HashMap;

/// Handle to an RGBA8 image owned by [`Gpu`](super::Gpu).
///
/// Ids are never reused, so a stale handle simply stops resolving.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(u32);

impl ImageId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to a sampler owned by [`Gpu`](super::Gpu).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SamplerId(u32);

impl SamplerId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Immutable 2D image description. Pixels are tightly packed RGBA8 rows.
#[derive(Debug, Clone, Copy)]
pub struct ImageDesc<'a> {
    pub label: Option<&'a str>,
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

impl ImageDesc<'_> {
    /// Byte length the pixel data must have.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Sampler description.
#[derive(Debug, Clone, Copy)]
pub struct SamplerDesc<'a> {
    pub label: Option<&'a str>,
    pub min_filter: wgpu::FilterMode,
    pub mag_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
    pub wrap_u: wgpu::AddressMode,
    pub wrap_v: wgpu::AddressMode,
}

impl Default for SamplerDesc<'_> {
    fn default() -> Self {
        Self {
            label: None,
            min_filter: wgpu::FilterMode::Nearest,
            mag_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            wrap_u: wgpu::AddressMode::Repeat,
            wrap_v: wgpu::AddressMode::Repeat,
        }
    }
}

/// Id-keyed storage with an optional slot limit.
///
/// Ids start at 1 and only grow; 0 is never handed out.
#[derive(Debug)]
pub(crate) struct Pool<T> {
    items: HashMap<u32, T>,
    next: u32,
    limit: Option<usize>,
}

impl<T> Pool<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: HashMap::new(),
            next: 1,
            limit: None,
        }
    }

    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Stores `item` and returns its id, or gives the item back when full.
    pub(crate) fn insert(&mut self, item: T) -> Result<u32, T> {
        if self.limit.is_some_and(|l| self.items.len() >= l) {
            return Err(item);
        }
        let id = self.next;
        self.next = self.next.wrapping_add(1).max(1);
        self.items.insert(id, item);
        Ok(id)
    }

    pub(crate) fn get(&self, id: u32) -> Option<&T> {
        self.items.get(&id)
    }

    pub(crate) fn contains(&self, id: u32) -> bool {
        self.items.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: u32) -> Option<T> {
        self.items.remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── pool ────────────────────────────────────────────────────────────

    #[test]
    fn ids_start_at_one_and_grow() {
        let mut pool = Pool::new();
        assert_eq!(pool.insert("a"), Ok(1));
        assert_eq!(pool.insert("b"), Ok(2));
        assert_eq!(pool.get(1), Some(&"a"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut pool = Pool::new();
        let a = pool.insert(10).unwrap();
        assert_eq!(pool.remove(a), Some(10));
        assert!(!pool.contains(a));
        let b = pool.insert(20).unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.get(a), None);
    }

    #[test]
    fn double_remove_is_none() {
        let mut pool = Pool::new();
        let a = pool.insert(()).unwrap();
        assert!(pool.remove(a).is_some());
        assert!(pool.remove(a).is_none());
    }

    #[test]
    fn limit_rejects_and_returns_item() {
        let mut pool = Pool::with_limit(1);
        assert!(pool.insert(1).is_ok());
        assert_eq!(pool.insert(2), Err(2));

        let first = 1;
        pool.remove(first);
        assert!(pool.insert(3).is_ok());
    }

    #[test]
    fn drain_empties_pool() {
        let mut pool = Pool::new();
        pool.insert(1).unwrap();
        pool.insert(2).unwrap();
        let mut all: Vec<_> = pool.drain().collect();
        all.sort();
        assert_eq!(all, vec![1, 2]);
        assert_eq!(pool.len(), 0);
    }

    // ── descriptors ─────────────────────────────────────────────────────

    #[test]
    fn expected_len_is_rgba8() {
        let desc = ImageDesc {
            label: None,
            width: 8,
            height: 4,
            data: &[],
        };
        assert_eq!(desc.expected_len(), 128);
    }

    #[test]
    fn default_sampler_is_point_sampled() {
        let s = SamplerDesc::default();
        assert_eq!(s.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(s.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(s.wrap_u, wgpu::AddressMode::Repeat);
    }

    #[test]
    fn handles_round_trip_raw() {
        assert_eq!(ImageId::from_raw(7).raw(), 7);
        assert_eq!(SamplerId::from_raw(3).raw(), 3);
    }
}
