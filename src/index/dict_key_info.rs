use std::{cmp::Ordering, fmt, io};

/// Hashed dictionary key of a term. The null key stands for "field absent"
/// and sorts after every regular key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DictKeyInfo {
    key: u64,
    is_null: bool,
}

impl DictKeyInfo {
    pub const NULL: DictKeyInfo = DictKeyInfo {
        key: 0,
        is_null: true,
    };

    pub const DICT_BYTES_LEN: usize = 9;

    pub const fn new(key: u64) -> Self {
        Self {
            key,
            is_null: false,
        }
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Order preserving byte form used as term dictionary key.
    pub fn to_dict_bytes(&self) -> [u8; Self::DICT_BYTES_LEN] {
        let mut bytes = [0u8; Self::DICT_BYTES_LEN];
        if self.is_null {
            bytes[0] = 1;
        } else {
            bytes[1..].copy_from_slice(&self.key.to_be_bytes());
        }
        bytes
    }

    pub fn from_dict_bytes(bytes: &[u8]) -> io::Result<Self> {
        match bytes {
            [1, rest @ ..] if rest.iter().all(|&b| b == 0) && rest.len() == 8 => Ok(Self::NULL),
            [0, rest @ ..] if rest.len() == 8 => {
                let mut key = [0u8; 8];
                key.copy_from_slice(rest);
                Ok(Self::new(u64::from_be_bytes(key)))
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed dictionary key {:?}", bytes),
            )),
        }
    }
}

impl Ord for DictKeyInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.is_null, self.key).cmp(&(other.is_null, other.key))
    }
}

impl PartialOrd for DictKeyInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for DictKeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null {
            write!(f, "DictKeyInfo(null)")
        } else {
            write!(f, "DictKeyInfo({})", self.key)
        }
    }
}

impl From<u64> for DictKeyInfo {
    fn from(key: u64) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::DictKeyInfo;

    #[test]
    fn test_null_sorts_last() {
        let mut keys = vec![DictKeyInfo::NULL, DictKeyInfo::new(u64::MAX), DictKeyInfo::new(0)];
        keys.sort();
        assert_eq!(
            keys,
            vec![DictKeyInfo::new(0), DictKeyInfo::new(u64::MAX), DictKeyInfo::NULL]
        );
        assert_ne!(DictKeyInfo::NULL, DictKeyInfo::new(0));
    }

    #[test]
    fn test_dict_bytes_keep_order() -> io::Result<()> {
        let keys = [DictKeyInfo::new(1), DictKeyInfo::new(256), DictKeyInfo::new(u64::MAX), DictKeyInfo::NULL];
        let bytes: Vec<_> = keys.iter().map(|k| k.to_dict_bytes()).collect();
        assert!(bytes.windows(2).all(|w| w[0] < w[1]));
        for (key, bytes) in keys.iter().zip(&bytes) {
            assert_eq!(DictKeyInfo::from_dict_bytes(bytes)?, *key);
        }
        assert!(DictKeyInfo::from_dict_bytes(&[0, 1]).is_err());
        Ok(())
    }
}
