// Fixed-size state and arc records of the archive body.

use bytemuck::{Pod, Zeroable};

use crate::fst::Arc;
use crate::weight::TropicalWeight;

/// Sentinel for "no start state" in an entry's start field.
pub const NO_STATE: u32 = u32::MAX;

/// Serialized state (16 bytes).
///
/// - `final_weight` (f32): tropical final weight, `+inf` for non-final states
/// - `first_arc` (u32): index of the state's first arc in the arc table
/// - `arc_count` (u32): number of consecutive arcs belonging to the state
/// - `_reserved` (u32): zero
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct StateRecord {
    pub final_weight: f32,
    pub first_arc: u32,
    pub arc_count: u32,
    pub _reserved: u32,
}

/// Serialized arc (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ArcRecord {
    pub ilabel: u32,
    pub olabel: u32,
    pub nextstate: u32,
    pub weight: f32,
}

impl From<&Arc> for ArcRecord {
    fn from(arc: &Arc) -> Self {
        Self {
            ilabel: arc.ilabel,
            olabel: arc.olabel,
            nextstate: arc.nextstate,
            weight: arc.weight.value(),
        }
    }
}

impl From<&ArcRecord> for Arc {
    fn from(record: &ArcRecord) -> Self {
        Arc::new(
            record.ilabel,
            record.olabel,
            TropicalWeight(record.weight),
            record.nextstate,
        )
    }
}

/// Copy `count` records starting at `offset` into an aligned `Vec`.
///
/// The caller has checked that the byte range is in bounds.
pub fn copy_records<T: Pod>(data: &[u8], offset: usize, count: usize) -> Vec<T> {
    let mut records = vec![T::zeroed(); count];
    let dst_bytes = bytemuck::cast_slice_mut::<T, u8>(&mut records);
    dst_bytes.copy_from_slice(&data[offset..offset + count * size_of::<T>()]);
    records
}

// Static assertions for struct sizes
const _: () = assert!(size_of::<StateRecord>() == 16);
const _: () = assert!(size_of::<ArcRecord>() == 16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes() {
        assert_eq!(size_of::<StateRecord>(), 16);
        assert_eq!(size_of::<ArcRecord>(), 16);
    }

    #[test]
    fn zero_copy_cast_arc_record() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&97u32.to_le_bytes()); // ilabel
        raw.extend_from_slice(&500u32.to_le_bytes()); // olabel
        raw.extend_from_slice(&3u32.to_le_bytes()); // nextstate
        raw.extend_from_slice(&1.5f32.to_le_bytes()); // weight

        let records: Vec<ArcRecord> = copy_records(&raw, 0, 1);
        assert_eq!(records[0].ilabel, 97);
        assert_eq!(records[0].olabel, 500);
        assert_eq!(records[0].nextstate, 3);
        assert_eq!(records[0].weight, 1.5);

        let arc = Arc::from(&records[0]);
        assert_eq!(arc.weight, TropicalWeight(1.5));
        assert_eq!(ArcRecord::from(&arc).olabel, 500);
    }

    #[test]
    fn copy_records_at_unaligned_offset() {
        let mut raw = vec![0xAAu8; 3];
        let state = StateRecord {
            final_weight: f32::INFINITY,
            first_arc: 7,
            arc_count: 2,
            _reserved: 0,
        };
        raw.extend_from_slice(bytemuck::bytes_of(&state));

        let states: Vec<StateRecord> = copy_records(&raw, 3, 1);
        assert_eq!(states[0].first_arc, 7);
        assert_eq!(states[0].arc_count, 2);
        assert!(states[0].final_weight.is_infinite());
    }
}
