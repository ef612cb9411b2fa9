//! Parses lines of the resolved trace (`Data.txt`) back into a decoded
//! instruction plus its timing-relevant annotation: an effective-address
//! list for vector memory ops, or the new vector length for `MTCL`.

use crate::error::TraceError;
use vvm::decode::{decode_line, DecodedLine};
use vvm::opcode::Opcode;
use vvm::Word;

/// One parsed line of `Data.txt`.
pub struct ParsedTrace {
    pub decoded: DecodedLine,
    pub addresses: Option<Vec<Word>>,
    pub vl_override: Option<Word>,
}

fn parse_address_list(line: usize, text: &str) -> Result<Vec<Word>, TraceError> {
    let inner = text.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|tok| {
            tok.trim()
                .parse::<Word>()
                .map_err(|_| TraceError::BadAddressList {
                    line,
                    text: text.to_string(),
                })
        })
        .collect()
}

/// Parses one resolved-trace line. `line_no` is the line's position in
/// `Data.txt`, used both as the instruction's PC and for error reporting.
pub fn parse_resolved_line(line_no: usize, raw: &str) -> Result<ParsedTrace, TraceError> {
    let trimmed = raw.trim();

    if let Some(open) = trimmed.find('(') {
        let close = trimmed.rfind(')').ok_or_else(|| TraceError::BadAddressList {
            line: line_no,
            text: trimmed.to_string(),
        })?;
        let base = trimmed[..open].trim();
        let addr_text = &trimmed[open + 1..close];
        let addresses = parse_address_list(line_no, addr_text)?;
        let decoded = decode_line(line_no, base).map_err(|source| TraceError::Decode {
            line: line_no,
            source,
        })?;
        return Ok(ParsedTrace {
            decoded,
            addresses: Some(addresses),
            vl_override: None,
        });
    }

    let mnemonic = trimmed.split_whitespace().next().unwrap_or("");
    if mnemonic == "MTCL" {
        let mut tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let value_tok = tokens.pop().ok_or_else(|| TraceError::BadVectorLength {
            line: line_no,
            text: trimmed.to_string(),
        })?;
        let value: Word = value_tok.parse().map_err(|_| TraceError::BadVectorLength {
            line: line_no,
            text: trimmed.to_string(),
        })?;
        let base = tokens.join(" ");
        let decoded = decode_line(line_no, &base).map_err(|source| TraceError::Decode {
            line: line_no,
            source,
        })?;
        return Ok(ParsedTrace {
            decoded,
            addresses: None,
            vl_override: Some(value),
        });
    }

    let decoded = decode_line(line_no, trimmed).map_err(|source| TraceError::Decode {
        line: line_no,
        source,
    })?;
    Ok(ParsedTrace {
        decoded,
        addresses: None,
        vl_override: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_instruction() {
        let parsed = parse_resolved_line(0, "ADD SR0 SR1 SR2").unwrap();
        assert_eq!(parsed.decoded.opcode, Opcode::ADD);
        assert!(parsed.addresses.is_none());
        assert!(parsed.vl_override.is_none());
    }

    #[test]
    fn parses_vector_memory_instruction_with_addresses() {
        let parsed = parse_resolved_line(0, "LV VR0 SR0 (4,5,6)").unwrap();
        assert_eq!(parsed.decoded.opcode, Opcode::LV);
        assert_eq!(parsed.addresses, Some(vec![4, 5, 6]));
    }

    #[test]
    fn parses_mtcl_with_trailing_vector_length() {
        let parsed = parse_resolved_line(0, "MTCL SR0 10").unwrap();
        assert_eq!(parsed.decoded.opcode, Opcode::MTCL);
        assert_eq!(parsed.vl_override, Some(10));
    }

    #[test]
    fn rejects_malformed_address_list() {
        assert!(parse_resolved_line(0, "LV VR0 SR0 (4,x,6)").is_err());
    }
}
