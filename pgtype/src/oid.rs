/// PostgreSQL object identifier of a data type.
pub type Oid = u32;

pub const UUID_OID: Oid = 2950;
pub const UUID_ARRAY_OID: Oid = 2951;

/// Wire format code used for a parameter or a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Text = 0,
    Binary = 1,
}

impl Format {
    pub fn code(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for Format {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Format::Text),
            1 => Ok(Format::Binary),
            code => Err(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_codes() {
        assert_eq!(Format::Text.code(), 0);
        assert_eq!(Format::Binary.code(), 1);
        assert_eq!(Format::try_from(1), Ok(Format::Binary));
        assert_eq!(Format::try_from(2), Err(2));
    }
}
