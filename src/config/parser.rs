//! Config line parser
//!
//! `,` separates fields, an unquoted `;` ends the record. `'` and `"`
//! flip one shared quote flag, so either character closes a span opened
//! by the other. Existing `Display.def` files rely on that, keep it.

use super::{FIELD_CAPACITY, MAX_FIELDS};

/// One field, excess characters dropped.
pub type Field = heapless::String<FIELD_CAPACITY>;

/// Fields of one record.
pub type Fields = heapless::Vec<Field, MAX_FIELDS>;

/// Split a line into fields.
///
/// Stops at the first unquoted `;` or once [`MAX_FIELDS`] fields are
/// complete. Reaching the end of the line completes the field in
/// progress. An empty line has no fields.
pub fn parse_fields(line: &str) -> Fields {
    let mut fields = Fields::new();
    if line.is_empty() {
        return fields;
    }

    let mut current = Field::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            ',' if !quoted => {
                let _ = fields.push(core::mem::take(&mut current));
                if fields.is_full() {
                    return fields;
                }
            }
            ';' if !quoted => {
                let _ = fields.push(current);
                return fields;
            }
            '"' | '\'' => quoted = !quoted,
            _ => {
                // Full field: drop silently
                let _ = current.push(c);
            }
        }
    }

    let _ = fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(fields: &Fields) -> Vec<&str> {
        fields.iter().map(|f| f.as_str()).collect()
    }

    #[test]
    fn test_plain_record() {
        let fields = parse_fields("Power,0x15,0x00;");
        assert_eq!(texts(&fields), ["Power", "0x15", "0x00"]);
    }

    #[test]
    fn test_text_after_terminator_ignored() {
        let fields = parse_fields("A,1,2; trailing,junk");
        assert_eq!(texts(&fields), ["A", "1", "2"]);
    }

    #[test]
    fn test_field_limit_stops_parsing() {
        let fields = parse_fields("0,1,2,3,4,5,6,7,8,9,10,11");
        assert_eq!(fields.len(), MAX_FIELDS);
        assert_eq!(fields[9].as_str(), "9");
    }

    #[test]
    fn test_empty_line_has_no_fields() {
        assert!(parse_fields("").is_empty());
    }
}
