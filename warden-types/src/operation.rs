use http::Method;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

bitflags::bitflags! {
    /// Operation is a bitset used to specify the type of request being
    /// made against a resource. Permission and policy masks are unions of
    /// the four primitives; a mask grants an operation iff the operation's
    /// bits are all present in the mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Operation: u8 {
        const CREATE = 1;
        const READ = 1 << 1;
        const UPDATE = 1 << 2;
        const DELETE = 1 << 3;

        const CR = Self::CREATE.bits() | Self::READ.bits();
        const RU = Self::READ.bits() | Self::UPDATE.bits();
        const RD = Self::READ.bits() | Self::DELETE.bits();
        const CRU = Self::CREATE.bits() | Self::READ.bits() | Self::UPDATE.bits();
        const RUD = Self::READ.bits() | Self::UPDATE.bits() | Self::DELETE.bits();
        const CRUD = Self::CREATE.bits() | Self::READ.bits() | Self::UPDATE.bits() | Self::DELETE.bits();
    }
}

impl Operation {
    /// Whether `op` is included in this mask. This is the sole authorization
    /// primitive: masks are never compared for equality.
    #[must_use]
    pub fn includes(self, op: Operation) -> bool {
        self.contains(op)
    }

    /// The fixed mapping from HTTP methods. Methods outside the four CRUD
    /// verbs are not subject to authorization and map to `None`.
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::READ),
            Method::POST => Some(Self::CREATE),
            Method::PUT => Some(Self::UPDATE),
            Method::DELETE => Some(Self::DELETE),
            _ => None,
        }
    }
}

// Masks travel through configuration as their raw bits. The bit assignments
// are fixed, so the integer form is stable across releases.
impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Self::from_bits(bits)
            .ok_or_else(|| de::Error::custom(format!("unknown operation bits `{bits:#b}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_includes_both_members() {
        assert!(Operation::CR.includes(Operation::CREATE));
        assert!(Operation::CR.includes(Operation::READ));
        assert!(!Operation::CR.includes(Operation::UPDATE));
        assert!(!Operation::CR.includes(Operation::DELETE));
    }

    #[test]
    fn crud_includes_every_primitive() {
        for op in [
            Operation::CREATE,
            Operation::READ,
            Operation::UPDATE,
            Operation::DELETE,
        ] {
            assert!(Operation::CRUD.includes(op));
        }
    }

    #[test]
    fn empty_mask_includes_nothing() {
        assert!(!Operation::empty().includes(Operation::READ));
        // Vacuously, every mask includes the empty mask.
        assert!(Operation::empty().includes(Operation::empty()));
    }

    #[test]
    fn method_mapping() {
        assert_eq!(
            Operation::from_method(&Method::GET),
            Some(Operation::READ)
        );
        assert_eq!(
            Operation::from_method(&Method::POST),
            Some(Operation::CREATE)
        );
        assert_eq!(
            Operation::from_method(&Method::PUT),
            Some(Operation::UPDATE)
        );
        assert_eq!(
            Operation::from_method(&Method::DELETE),
            Some(Operation::DELETE)
        );
        assert_eq!(Operation::from_method(&Method::PATCH), None);
        assert_eq!(Operation::from_method(&Method::OPTIONS), None);
    }

    #[test]
    fn serde_round_trip() {
        let serialized = serde_json::to_string(&Operation::CRU).unwrap();
        assert_eq!(serialized, "7");
        let mask: Operation = serde_json::from_str(&serialized).unwrap();
        assert_eq!(mask, Operation::CRU);

        // Bits outside the defined flags are rejected.
        assert!(serde_json::from_str::<Operation>("16").is_err());
    }
}
