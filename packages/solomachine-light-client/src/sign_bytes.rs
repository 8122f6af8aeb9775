//! Canonical encodings of everything a solo machine signs.
//!
//! Equivocation evidence signs `be_u64(sequence) || data`. Headers and
//! membership proofs sign a [`SignBytes`] envelope that additionally binds the
//! timestamp, the diversifier and the kind of statement being made. Variable
//! length fields are prefixed with their big-endian `u32` length so no two
//! distinct statements share an encoding.

/// Kind of statement carried in [`SignBytes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    /// Key and diversifier rotation
    Header = 1,
    /// A value stored under a path
    Membership = 2,
    /// Absence of any value under a path
    NonMembership = 3,
}

impl DataType {
    /// Picks the membership data type and builds its payload
    #[must_use]
    pub fn for_membership(path: &[u8], value: Option<&[u8]>) -> (Self, Vec<u8>) {
        let mut data = Vec::new();
        put_length_prefixed(&mut data, path);
        match value {
            Some(value) => {
                put_length_prefixed(&mut data, value);
                (Self::Membership, data)
            }
            None => (Self::NonMembership, data),
        }
    }
}

/// Envelope signed for headers and membership proofs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignBytes<'a> {
    /// Sequence the statement is made at
    pub sequence: u64,
    /// Timestamp claimed by the signer
    pub timestamp: u64,
    /// Diversifier of the client the statement is meant for
    pub diversifier: &'a str,
    /// Kind of statement
    pub data_type: DataType,
    /// Statement payload
    pub data: &'a [u8],
}

impl SignBytes<'_> {
    /// Encodes the envelope
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bz = Vec::with_capacity(8 + 8 + 4 + self.diversifier.len() + 1 + 4 + self.data.len());
        bz.extend_from_slice(&self.sequence.to_be_bytes());
        bz.extend_from_slice(&self.timestamp.to_be_bytes());
        put_length_prefixed(&mut bz, self.diversifier.as_bytes());
        bz.push(self.data_type as u8);
        put_length_prefixed(&mut bz, self.data);
        bz
    }
}

/// Message signed by each half of a misbehaviour: `be_u64(sequence) || data`
#[must_use]
pub fn misbehaviour_sign_bytes(sequence: u64, data: &[u8]) -> Vec<u8> {
    let mut bz = Vec::with_capacity(8 + data.len());
    bz.extend_from_slice(&sequence.to_be_bytes());
    bz.extend_from_slice(data);
    bz
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn put_length_prefixed(bz: &mut Vec<u8>, field: &[u8]) {
    bz.extend_from_slice(&(field.len() as u32).to_be_bytes());
    bz.extend_from_slice(field);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misbehaviour_bytes_are_big_endian_sequence_then_data() {
        let parts: [&[u8]; 2] = [&[0, 0, 0, 0, 0, 0, 0, 5], b"msg-A"];
        assert_eq!(misbehaviour_sign_bytes(5, b"msg-A"), parts.concat());
        assert_eq!(
            misbehaviour_sign_bytes(0x0102_0304_0506_0708, b""),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn sign_bytes_layout() {
        let bz = SignBytes {
            sequence: 1,
            timestamp: 2,
            diversifier: "ab",
            data_type: DataType::Header,
            data: &[9, 9, 9],
        }
        .encode();

        let parts: [&[u8]; 7] = [
            &1u64.to_be_bytes(),
            &2u64.to_be_bytes(),
            &[0, 0, 0, 2],
            b"ab",
            &[1],
            &[0, 0, 0, 3],
            &[9, 9, 9],
        ];
        assert_eq!(bz, parts.concat());
    }

    #[test]
    fn membership_and_non_membership_never_collide() {
        // an empty value is still a membership statement
        let (member_ty, member) = DataType::for_membership(b"path", Some(b""));
        let (absent_ty, absent) = DataType::for_membership(b"path", None);
        assert_eq!(member_ty, DataType::Membership);
        assert_eq!(absent_ty, DataType::NonMembership);
        assert_ne!(member, absent);
    }

    #[test]
    fn length_prefix_separates_path_and_value() {
        let (_, a) = DataType::for_membership(b"ab", Some(b"c"));
        let (_, b) = DataType::for_membership(b"a", Some(b"bc"));
        assert_ne!(a, b);
    }
}
