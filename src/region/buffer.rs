//! Byte buffer partitioned into independently growable regions
//!
//! ```text
//! ┌──────────────┬──────────────────┬───────────────────────────────┐
//! │ handles      │ headers          │ data                          │
//! │ u32 per id   │ 12 bytes/header  │ region bytes, packed          │
//! └──────────────┴──────────────────┴───────────────────────────────┘
//! ```
//!
//! A handle is the offset of its region's header inside the header area, or
//! [`EMPTY_HANDLE`] until the region first receives data. A header points at
//! the region's bytes inside the data area. Both areas double when they run
//! out of room, shifting everything after them.

use tracing::{debug, trace};

use crate::{
    codec::{endian::ensure_swap_size, Unmanaged, MAX_SWAP_SIZE},
    error::{Result, SlimError},
    writer::BufferWriter,
};

use super::headers::{RegionHeader, RegionId, EMPTY_HANDLE, HANDLE_SIZE, HEADER_SIZE};

/// Capacity rented by [`RegionByteBuffer::new`]
pub const DEFAULT_REGION_CAPACITY: usize = 256;

/// A single byte buffer holding many regions that can each be appended to
pub struct RegionByteBuffer<'a> {
    writer: BufferWriter<'a, u8>,
    region_count: u32,
    /// Size of the handle area in bytes
    handle_capacity: usize,
    /// Size of the header area in bytes
    header_capacity: usize,
    /// Bytes of the header area in use
    header_length: usize,
    /// Bytes of the data area in use
    data_length: usize,
}

impl RegionByteBuffer<'static> {
    /// Create an empty buffer on pooled memory
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REGION_CAPACITY)
    }

    /// Create an empty buffer on at least `capacity` pooled bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_writer(BufferWriter::with_capacity(capacity))
    }
}

impl Default for RegionByteBuffer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RegionByteBuffer<'a> {
    /// Start on caller-owned memory, moving to pooled memory once it is full
    pub fn with_buffer(initial: &'a mut [u8]) -> Self {
        Self::from_writer(BufferWriter::new(initial))
    }

    fn from_writer(writer: BufferWriter<'a, u8>) -> Self {
        Self {
            writer,
            region_count: 0,
            handle_capacity: 0,
            header_capacity: 0,
            header_length: 0,
            data_length: 0,
        }
    }

    /// Number of ids handed out
    pub fn region_count(&self) -> u32 {
        self.region_count
    }

    /// Number of regions that currently own a header
    pub fn active_region_count(&self) -> usize {
        self.header_length / HEADER_SIZE
    }

    /// Total bytes stored across all regions
    pub fn data_len(&self) -> usize {
        self.data_length
    }

    /// The used part of the buffer: handle area, header area, then data
    pub fn as_bytes(&self) -> &[u8] {
        self.writer.written()
    }

    /// Allocate a new, empty region
    pub fn add_region(&mut self) -> Result<RegionId> {
        let next = self
            .region_count
            .checked_add(1)
            .ok_or_else(|| {
                SlimError::out_of_range("region_count", u32::MAX as usize, u32::MAX as usize - 1)
            })?;

        self.grow_handles(next as usize * HANDLE_SIZE)?;

        let id = RegionId(self.region_count);
        self.region_count = next;
        self.put_u32(id.handle_offset(), EMPTY_HANDLE);
        self.sync_position();

        trace!(region = id.value(), "region added");
        Ok(id)
    }

    /// Append raw bytes to the end of region `id`
    pub fn append(&mut self, id: RegionId, bytes: &[u8]) -> Result<()> {
        self.append_items(id, bytes, 0)
    }

    /// Append one value, little-endian, and bump the region's item count
    pub fn append_value<T: Unmanaged>(&mut self, id: RegionId, value: T) -> Result<()> {
        ensure_swap_size::<T>()?;

        let mut raw = [0u8; MAX_SWAP_SIZE];
        value.write_le(&mut raw[..T::SIZE]);
        self.append_items(id, &raw[..T::SIZE], 1)
    }

    /// Bytes of region `id`; empty when it has never received data
    pub fn region_span(&self, id: RegionId) -> Result<&[u8]> {
        let range = match self.header(id)? {
            Some((_, header)) => self.data_range(&header),
            None => return Ok(&[]),
        };
        Ok(&self.writer.buffer()[range])
    }

    /// Bytes of region `id`, mutably
    pub fn region_span_mut(&mut self, id: RegionId) -> Result<&mut [u8]> {
        let range = match self.header(id)? {
            Some((_, header)) => self.data_range(&header),
            None => return Ok(&mut []),
        };
        Ok(&mut self.writer.buffer_mut()[range])
    }

    /// Byte length of region `id`
    pub fn region_len(&self, id: RegionId) -> Result<usize> {
        Ok(self
            .header(id)?
            .map_or(0, |(_, header)| header.data_length as usize))
    }

    /// Number of values appended to region `id` with [`append_value`](Self::append_value)
    pub fn region_item_count(&self, id: RegionId) -> Result<u32> {
        Ok(self.header(id)?.map_or(0, |(_, header)| header.count))
    }

    /// Read the `index`-th value of a region filled with `append_value::<T>`
    pub fn read_value<T: Unmanaged>(&self, id: RegionId, index: usize) -> Result<T> {
        let span = self.region_span(id)?;
        let start = index.saturating_mul(T::SIZE);
        match start.checked_add(T::SIZE) {
            Some(end) if end <= span.len() => Ok(T::read_le(&span[start..end])),
            _ => Err(SlimError::end_of_buffer(
                start.saturating_add(T::SIZE),
                span.len(),
            )),
        }
    }

    /// Drop the data and header of region `id`
    ///
    /// The id stays valid and reads back as an empty region. Data and headers
    /// behind it are compacted.
    pub fn clear_region(&mut self, id: RegionId) -> Result<()> {
        let (handle, removed) = match self.header(id)? {
            Some(found) => found,
            None => return Ok(()),
        };

        let data_start = self.data_start();
        let removed_start = data_start + removed.data_offset as usize;
        let removed_len = removed.data_length as usize;
        let tail_start = removed_start + removed_len;
        let tail_len = data_start + self.data_length - tail_start;
        if removed_len > 0 {
            self.writer
                .move_within(tail_start, tail_len, removed_start, false)?;
            self.data_length -= removed_len;

            let removed_end = removed.data_end();
            for offset in self.header_offsets() {
                if offset == handle as usize {
                    continue;
                }
                let mut header = self.header_at(offset);
                if header.data_offset as usize >= removed_end {
                    header.data_offset -= removed.data_length;
                    self.put_header(offset, &header);
                }
            }
        }

        let header_start = self.header_start();
        let removed_at = header_start + handle as usize;
        let after = removed_at + HEADER_SIZE;
        let after_len = header_start + self.header_length - after;
        self.writer.move_within(after, after_len, removed_at, false)?;
        self.header_length -= HEADER_SIZE;

        for other in 0..self.region_count {
            let at = RegionId(other).handle_offset();
            let value = self.u32_at(at);
            if value != EMPTY_HANDLE && value > handle {
                self.put_u32(at, value - HEADER_SIZE as u32);
            }
        }
        self.put_u32(id.handle_offset(), EMPTY_HANDLE);
        self.sync_position();

        trace!(region = id.value(), bytes = removed_len, "region cleared");
        Ok(())
    }

    /// Forget every region and release the backing memory
    pub fn dispose(&mut self) {
        self.writer.dispose();
        self.region_count = 0;
        self.handle_capacity = 0;
        self.header_capacity = 0;
        self.header_length = 0;
        self.data_length = 0;
    }

    fn append_items(&mut self, id: RegionId, bytes: &[u8], items: u32) -> Result<()> {
        let added = to_u32(bytes.len(), "bytes.len()")?;
        to_u32(self.data_length.saturating_add(bytes.len()), "data length")?;

        let (handle, mut header) = match self.header(id)? {
            Some(found) => found,
            None => self.open_region(id)?,
        };
        // Bounded by the total data length checked above
        let new_length = header.data_length + added;

        let insert_at = self.data_start() + header.data_end();
        let used_end = self.used_end();
        self.writer.advance_to(used_end + bytes.len());
        self.writer
            .move_within(insert_at, used_end - insert_at, insert_at + bytes.len(), false)?;
        self.writer.buffer_mut()[insert_at..insert_at + bytes.len()].copy_from_slice(bytes);
        self.data_length += bytes.len();

        // Regions stored behind this one slide forward
        if !bytes.is_empty() {
            let end = header.data_end();
            for offset in self.header_offsets() {
                if offset == handle as usize {
                    continue;
                }
                let mut other = self.header_at(offset);
                if other.data_offset as usize >= end {
                    other.data_offset += added;
                    self.put_header(offset, &other);
                }
            }
        }

        header.data_length = new_length;
        header.count = header.count.saturating_add(items);
        self.put_header(handle as usize, &header);
        self.sync_position();
        Ok(())
    }

    /// Give region `id` a zero-length header at the end of the data area
    fn open_region(&mut self, id: RegionId) -> Result<(u32, RegionHeader)> {
        self.grow_headers(self.header_length + HEADER_SIZE)?;

        let handle = to_u32(self.header_length, "header offset")?;
        let header = RegionHeader {
            data_offset: to_u32(self.data_length, "data offset")?,
            data_length: 0,
            count: 0,
        };
        self.header_length += HEADER_SIZE;
        self.put_header(handle as usize, &header);
        self.put_u32(id.handle_offset(), handle);
        Ok((handle, header))
    }

    /// Make the handle area at least `needed` bytes, shifting headers and data
    fn grow_handles(&mut self, needed: usize) -> Result<()> {
        if needed <= self.handle_capacity {
            return Ok(());
        }

        let new_capacity = needed.max(self.handle_capacity * 2);
        let moved = self.header_capacity + self.data_length;
        self.writer
            .move_within(self.handle_capacity, moved, new_capacity, false)?;

        debug!(
            from = self.handle_capacity,
            to = new_capacity,
            "region handle area grown"
        );
        self.handle_capacity = new_capacity;
        Ok(())
    }

    /// Make the header area at least `needed` bytes, shifting data
    fn grow_headers(&mut self, needed: usize) -> Result<()> {
        if needed <= self.header_capacity {
            return Ok(());
        }

        let new_capacity = needed.max(self.header_capacity * 2);
        self.writer.move_within(
            self.data_start(),
            self.data_length,
            self.handle_capacity + new_capacity,
            false,
        )?;

        debug!(
            from = self.header_capacity,
            to = new_capacity,
            "region header area grown"
        );
        self.header_capacity = new_capacity;
        Ok(())
    }

    /// Handle offset and header of `id`, `None` when it has no data yet
    fn header(&self, id: RegionId) -> Result<Option<(u32, RegionHeader)>> {
        if id.0 >= self.region_count {
            return Err(SlimError::region_not_found(id.0));
        }

        let handle = self.u32_at(id.handle_offset());
        if handle == EMPTY_HANDLE {
            return Ok(None);
        }
        Ok(Some((handle, self.header_at(handle as usize))))
    }

    fn header_at(&self, offset: usize) -> RegionHeader {
        let at = self.header_start() + offset;
        RegionHeader::read_le(&self.writer.buffer()[at..at + HEADER_SIZE])
    }

    fn put_header(&mut self, offset: usize, header: &RegionHeader) {
        let at = self.header_start() + offset;
        header.write_le(&mut self.writer.buffer_mut()[at..at + HEADER_SIZE]);
    }

    fn header_offsets(&self) -> impl Iterator<Item = usize> {
        (0..self.header_length).step_by(HEADER_SIZE)
    }

    fn u32_at(&self, at: usize) -> u32 {
        u32::read_le(&self.writer.buffer()[at..at + HANDLE_SIZE])
    }

    fn put_u32(&mut self, at: usize, value: u32) {
        value.write_le(&mut self.writer.buffer_mut()[at..at + HANDLE_SIZE]);
    }

    fn data_range(&self, header: &RegionHeader) -> std::ops::Range<usize> {
        let start = self.data_start() + header.data_offset as usize;
        start..start + header.data_length as usize
    }

    fn header_start(&self) -> usize {
        self.handle_capacity
    }

    fn data_start(&self) -> usize {
        self.handle_capacity + self.header_capacity
    }

    fn used_end(&self) -> usize {
        self.data_start() + self.data_length
    }

    fn sync_position(&mut self) {
        let end = self.used_end();
        self.writer.advance_to(end);
    }
}

impl std::fmt::Debug for RegionByteBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionByteBuffer")
            .field("region_count", &self.region_count)
            .field("active_regions", &self.active_region_count())
            .field("handle_capacity", &self.handle_capacity)
            .field("header_capacity", &self.header_capacity)
            .field("data_length", &self.data_length)
            .finish()
    }
}

fn to_u32(value: usize, parameter: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| SlimError::out_of_range(parameter, value, u32::MAX as usize))
}
