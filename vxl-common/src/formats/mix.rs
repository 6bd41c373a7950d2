//! MIX archive container codec.
//!
//! An unencrypted, uncompressed indexed bundle of files. Members are
//! addressed by a 32-bit id derived from the uppercased filename; the
//! index is sorted ascending by id so the engine can binary-search it.
//!
//! # Layout
//! ```text
//! 0x00: u32 flags (0 = no encryption, no checksum)
//! 0x04: u16 member count
//! 0x06: u32 total body size
//! 0x0A: index records (count x 12 bytes: id u32, offset u32, size u32)
//! var:  member bodies, concatenated in index order
//! ```
//!
//! Body offsets are relative to the end of the index. The id hash is a
//! rolling rotate-add, not a checksum: renaming a file changes its id
//! unpredictably, and two names can collide. A collision is always
//! rejected at pack time, never resolved by overwriting.

use hashbrown::HashMap;

use crate::error::FormatError;
use crate::formats::hva::HvaHeader;
use crate::formats::vxl::VXL_MAGIC;

/// Fixed archive header size (flags, count, body size).
pub const MIX_HEADER_SIZE: usize = 10;

/// Size of one index record (id, offset, size).
pub const MIX_INDEX_RECORD_SIZE: usize = 12;

/// Compute the archive lookup id for a member name.
///
/// Uppercases the name, then folds each byte into a running 32-bit
/// accumulator: `acc = rotate_left(acc, 1) + byte`, wrapping.
pub fn member_id(name: &str) -> u32 {
    let mut acc: u32 = 0;
    for b in name.bytes() {
        acc = acc.rotate_left(1).wrapping_add(b.to_ascii_uppercase() as u32);
    }
    acc
}

/// One archive member. `name` survives only on the pack side; an archive
/// decoded from bytes knows its members by id alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixMember {
    pub id: u32,
    pub name: Option<String>,
    pub bytes: Vec<u8>,
}

/// An indexed archive, sorted by member id. Write-once: built either
/// from a finalized member set via [`MixArchive::pack`] or from bytes via
/// [`MixArchive::from_bytes`], then read-only.
#[derive(Debug, Clone)]
pub struct MixArchive {
    members: Vec<MixMember>,
    by_id: HashMap<u32, usize>,
}

impl MixArchive {
    /// Build an archive from named files. Copies the bytes, computes ids,
    /// rejects id collisions, and sorts ascending by id.
    pub fn pack<I>(files: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let mut members = Vec::new();
        let mut by_id: HashMap<u32, usize> = HashMap::new();

        for (name, bytes) in files {
            let id = member_id(&name);
            if let Some(&existing) = by_id.get(&id) {
                let first: &MixMember = &members[existing];
                return Err(FormatError::DuplicateMemberId {
                    id,
                    first: first.name.clone().unwrap_or_default(),
                    second: name,
                });
            }
            by_id.insert(id, members.len());
            members.push(MixMember {
                id,
                name: Some(name),
                bytes,
            });
        }

        members.sort_by_key(|m| m.id);
        let by_id = members.iter().enumerate().map(|(i, m)| (m.id, i)).collect();
        Ok(Self { members, by_id })
    }

    /// Serialize: header, sorted index, concatenated bodies.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let count: u16 = self.members.len().try_into().map_err(|_| {
            FormatError::FieldOverflow {
                what: "member count",
                value: self.members.len() as u64,
                field: "u16",
            }
        })?;
        let body_size: u64 = self.members.iter().map(|m| m.bytes.len() as u64).sum();
        let body_size: u32 = body_size.try_into().map_err(|_| FormatError::FieldOverflow {
            what: "body size",
            value: body_size,
            field: "u32",
        })?;

        let mut out = Vec::with_capacity(
            MIX_HEADER_SIZE + self.members.len() * MIX_INDEX_RECORD_SIZE + body_size as usize,
        );
        out.extend_from_slice(&0u32.to_le_bytes()); // flags: unencrypted
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&body_size.to_le_bytes());

        let mut offset = 0u32;
        for member in &self.members {
            out.extend_from_slice(&member.id.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&(member.bytes.len() as u32).to_le_bytes());
            offset += member.bytes.len() as u32;
        }
        for member in &self.members {
            out.extend_from_slice(&member.bytes);
        }
        Ok(out)
    }

    /// Decode an archive, verifying index order and body accounting.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < MIX_HEADER_SIZE {
            return Err(FormatError::TruncatedInput {
                offset: 0,
                needed: MIX_HEADER_SIZE,
                available: bytes.len(),
            });
        }
        // flags at 0..4 are read through; encrypted archives are a non-goal.
        let count = u16::from_le_bytes([bytes[4], bytes[5]]) as usize;
        let body_size = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);

        let body_start = MIX_HEADER_SIZE + count * MIX_INDEX_RECORD_SIZE;
        if bytes.len() < body_start + body_size as usize {
            return Err(FormatError::TruncatedInput {
                offset: body_start,
                needed: body_size as usize,
                available: bytes.len(),
            });
        }
        let body = &bytes[body_start..body_start + body_size as usize];

        let mut members = Vec::with_capacity(count);
        let mut by_id: HashMap<u32, usize> = HashMap::with_capacity(count);
        let mut prev_id: Option<u32> = None;
        let mut total = 0usize;

        for i in 0..count {
            let record = &bytes[MIX_HEADER_SIZE + i * MIX_INDEX_RECORD_SIZE..];
            let id = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
            let offset = u32::from_le_bytes([record[4], record[5], record[6], record[7]]);
            let size = u32::from_le_bytes([record[8], record[9], record[10], record[11]]);

            if let Some(prev) = prev_id {
                if id < prev {
                    return Err(FormatError::UnsortedIndex {
                        position: i,
                        prev,
                        next: id,
                    });
                }
            }
            prev_id = Some(id);

            if by_id.contains_key(&id) {
                return Err(FormatError::DuplicateMemberId {
                    id,
                    first: format!("{:#010x}", id),
                    second: format!("{:#010x}", id),
                });
            }

            let lo = offset as usize;
            let hi = lo + size as usize;
            let member_bytes = body.get(lo..hi).ok_or(FormatError::TruncatedInput {
                offset: body_start + lo,
                needed: size as usize,
                available: bytes.len(),
            })?;

            total += size as usize;
            by_id.insert(id, members.len());
            members.push(MixMember {
                id,
                name: None,
                bytes: member_bytes.to_vec(),
            });
        }

        if total != body_size as usize {
            return Err(FormatError::ArchiveBodyMismatch {
                declared: body_size,
                actual: total,
            });
        }

        Ok(Self { members, by_id })
    }

    /// Member with the given id, if present.
    pub fn member(&self, id: u32) -> Option<&MixMember> {
        self.by_id.get(&id).map(|&i| &self.members[i])
    }

    /// Member whose name hashes to a present id.
    pub fn member_by_name(&self, name: &str) -> Option<&MixMember> {
        self.member(member_id(name))
    }

    /// All members, ascending by id.
    pub fn members(&self) -> &[MixMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Best-effort classification of member bytes, for listing archives whose
/// index stores only ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Vxl,
    Hva,
    Other,
}

/// Classify member bytes by content: VXL by magic, HVA by a plausible
/// header whose implied size matches the buffer exactly.
pub fn sniff_member(bytes: &[u8]) -> MemberKind {
    if bytes.len() >= VXL_MAGIC.len() && bytes[..VXL_MAGIC.len()] == VXL_MAGIC {
        return MemberKind::Vxl;
    }
    if let Some(header) = HvaHeader::from_bytes(bytes) {
        if header.frame_count > 0
            && header.section_count > 0
            && header.expected_file_size() == bytes.len()
        {
            return MemberKind::Hva;
        }
    }
    MemberKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::hva::HvaFile;
    use crate::formats::name::SectionName;

    #[test]
    fn test_member_id_is_case_insensitive() {
        assert_eq!(member_id("a.vxl"), member_id("A.VXL"));
        // acc folds to 2004 for "A.VXL": 65, 46, 86, 88, 76.
        assert_eq!(member_id("A.VXL"), 2004);
    }

    #[test]
    fn test_member_id_order_dependent() {
        assert_ne!(member_id("AB"), member_id("BA"));
    }

    #[test]
    fn test_two_member_archive_layout() {
        // 3-byte and 5-byte members: 10 header + 24 index + 8 bodies = 42.
        let archive = MixArchive::pack([
            ("A.vxl".to_string(), vec![1, 2, 3]),
            ("B.vxl".to_string(), vec![4, 5, 6, 7, 8]),
        ])
        .unwrap();
        let bytes = archive.to_bytes().unwrap();
        assert_eq!(bytes.len(), 42);

        let unpacked = MixArchive::from_bytes(&bytes).unwrap();
        assert_eq!(unpacked.len(), 2);
        assert_eq!(unpacked.member_by_name("A.vxl").unwrap().bytes, [1, 2, 3]);
        assert_eq!(
            unpacked.member_by_name("b.VXL").unwrap().bytes,
            [4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_pack_is_order_independent() {
        let forward = MixArchive::pack([
            ("A.vxl".to_string(), vec![1, 2, 3]),
            ("B.vxl".to_string(), vec![4, 5]),
        ])
        .unwrap();
        let reverse = MixArchive::pack([
            ("B.vxl".to_string(), vec![4, 5]),
            ("A.vxl".to_string(), vec![1, 2, 3]),
        ])
        .unwrap();
        assert_eq!(forward.to_bytes().unwrap(), reverse.to_bytes().unwrap());
    }

    #[test]
    fn test_index_sorted_by_id() {
        let archive = MixArchive::pack([
            ("zzz.hva".to_string(), vec![1]),
            ("a.vxl".to_string(), vec![2]),
        ])
        .unwrap();
        let ids: Vec<u32> = archive.members().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        // Same name modulo case hashes identically.
        let err = MixArchive::pack([
            ("tank.vxl".to_string(), vec![1]),
            ("TANK.VXL".to_string(), vec![2]),
        ])
        .unwrap_err();
        match err {
            FormatError::DuplicateMemberId { first, second, .. } => {
                assert_eq!(first, "tank.vxl");
                assert_eq!(second, "TANK.VXL");
            }
            other => panic!("expected DuplicateMemberId, got {other:?}"),
        }
    }

    #[test]
    fn test_unpack_rejects_unsorted_index() {
        let archive = MixArchive::pack([
            ("A.vxl".to_string(), vec![1]),
            ("B.vxl".to_string(), vec![2]),
        ])
        .unwrap();
        let mut bytes = archive.to_bytes().unwrap();
        // Swap the two index records.
        let (a, b) = (MIX_HEADER_SIZE, MIX_HEADER_SIZE + MIX_INDEX_RECORD_SIZE);
        let first: Vec<u8> = bytes[a..a + MIX_INDEX_RECORD_SIZE].to_vec();
        let second: Vec<u8> = bytes[b..b + MIX_INDEX_RECORD_SIZE].to_vec();
        bytes[a..a + MIX_INDEX_RECORD_SIZE].copy_from_slice(&second);
        bytes[b..b + MIX_INDEX_RECORD_SIZE].copy_from_slice(&first);

        assert!(matches!(
            MixArchive::from_bytes(&bytes).unwrap_err(),
            FormatError::UnsortedIndex { position: 1, .. }
        ));
    }

    #[test]
    fn test_unpack_validates_body_size() {
        let archive = MixArchive::pack([("A.vxl".to_string(), vec![1, 2, 3])]).unwrap();
        let mut bytes = archive.to_bytes().unwrap();
        // Shrink the record's size so bodies no longer add up.
        bytes[MIX_HEADER_SIZE + 8..MIX_HEADER_SIZE + 12].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(
            MixArchive::from_bytes(&bytes).unwrap_err(),
            FormatError::ArchiveBodyMismatch {
                declared: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_unpack_truncated() {
        let archive = MixArchive::pack([("A.vxl".to_string(), vec![1, 2, 3])]).unwrap();
        let bytes = archive.to_bytes().unwrap();
        assert!(matches!(
            MixArchive::from_bytes(&bytes[..bytes.len() - 2]).unwrap_err(),
            FormatError::TruncatedInput { .. }
        ));
    }

    #[test]
    fn test_sniff_member() {
        let mut vxl_bytes = VXL_MAGIC.to_vec();
        vxl_bytes.extend_from_slice(&[0u8; 64]);
        assert_eq!(sniff_member(&vxl_bytes), MemberKind::Vxl);

        let hva = HvaFile::identity("TANK", vec![SectionName::new("Body")]);
        assert_eq!(sniff_member(&hva.encode().unwrap()), MemberKind::Hva);

        assert_eq!(sniff_member(b"not a model"), MemberKind::Other);

        // A member that parses as an HVA header with absurd counts must
        // classify cleanly, not crash on size arithmetic.
        let mut hostile = [0u8; 24];
        hostile[16..20].copy_from_slice(&u32::MAX.to_le_bytes());
        hostile[20..24].copy_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(sniff_member(&hostile), MemberKind::Other);
    }
}
