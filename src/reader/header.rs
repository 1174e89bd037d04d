use noodles::vcf::{
    self,
    header::record::value::{
        Map,
        map::{Format, Info},
    },
};

use crate::error::{CustomError, Result};

/// Adds an INFO declaration. Repeating an identical declaration is a no-op;
/// a different definition under an existing ID is an error.
pub fn declare_info(header: &mut vcf::Header, id: &str, definition: Map<Info>) -> Result<()> {
    match header.infos().get(id) {
        Some(existing) if *existing == definition => Ok(()),
        Some(_) => Err(CustomError::InfoConflict { id: id.to_string() }),
        None => {
            header.infos_mut().insert(id.to_string(), definition);
            Ok(())
        }
    }
}

/// Adds a FORMAT declaration unless one with the same ID exists.
pub fn ensure_format(header: &mut vcf::Header, id: &str) {
    if !header.formats().contains_key(id) {
        header
            .formats_mut()
            .insert(id.to_string(), Map::<Format>::from(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::testing::header_with_samples;
    use noodles::vcf::header::record::value::map::info::{Number, Type};

    fn info(description: &str) -> Map<Info> {
        Map::<Info>::new(Number::Unknown, Type::Integer, description)
    }

    #[test]
    fn declare_info_is_idempotent_but_rejects_conflicts() {
        let mut header = header_with_samples(2);
        declare_info(&mut header, "PASS_01_2", info("one")).unwrap();
        declare_info(&mut header, "PASS_01_2", info("one")).unwrap();
        assert_eq!(header.infos().len(), 1);
        let err = declare_info(&mut header, "PASS_01_2", info("two")).unwrap_err();
        assert!(matches!(err, CustomError::InfoConflict { .. }));
    }

    #[test]
    fn ensure_format_keeps_existing_definition() {
        let mut header = header_with_samples(1);
        let before = header.formats().get("FT").cloned();
        ensure_format(&mut header, "FT");
        assert_eq!(header.formats().get("FT").cloned(), before);

        ensure_format(&mut header, "GQ");
        assert!(header.formats().contains_key("GQ"));
        assert_eq!(header.formats().len(), 4);
    }
}
