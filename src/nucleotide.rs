//! Two-bit nucleotide codes and the transition/transversion rule.

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Base {
    /// Code of the first base of an allele; `None` for anything but ACGT.
    pub fn from_allele(allele: &str) -> Option<Self> {
        match allele.as_bytes().first()?.to_ascii_uppercase() {
            b'A' => Some(Base::A),
            b'C' => Some(Base::C),
            b'G' => Some(Base::G),
            b'T' => Some(Base::T),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    Transition,
    Transversion,
}

impl Substitution {
    /// A <-> G and C <-> T sit two codes apart; every other change is a
    /// transversion. Identical bases are no substitution at all.
    pub fn between(reference: Base, alternate: Base) -> Option<Self> {
        match reference.code().abs_diff(alternate.code()) {
            0 => None,
            2 => Some(Substitution::Transition),
            _ => Some(Substitution::Transversion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_to_g_is_transition() {
        assert_eq!(
            Substitution::between(Base::A, Base::G),
            Some(Substitution::Transition)
        );
        assert_eq!(
            Substitution::between(Base::T, Base::C),
            Some(Substitution::Transition)
        );
    }

    #[test]
    fn a_to_c_is_transversion() {
        assert_eq!(
            Substitution::between(Base::A, Base::C),
            Some(Substitution::Transversion)
        );
        assert_eq!(
            Substitution::between(Base::A, Base::T),
            Some(Substitution::Transversion)
        );
        assert_eq!(
            Substitution::between(Base::G, Base::T),
            Some(Substitution::Transversion)
        );
    }

    #[test]
    fn same_base_is_no_substitution() {
        assert_eq!(Substitution::between(Base::C, Base::C), None);
    }

    #[test]
    fn allele_strings() {
        assert_eq!(Base::from_allele("g"), Some(Base::G));
        assert_eq!(Base::from_allele("N"), None);
        assert_eq!(Base::from_allele(""), None);
        assert_eq!(Base::from_allele("<DEL>"), None);
        assert_eq!(Base::from_allele("TTA"), Some(Base::T));
    }
}
