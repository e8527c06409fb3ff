//! The registry of monitor properties that can be set over the vendor HID protocol.
//!
//! Every entry pairs a user-facing name with the protocol code the monitor firmware uses to
//! select the setting, and the inclusive range of values the firmware accepts for it.

/// Inclusive range of values a property accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueRange {
    min: i64,
    max: i64,
}

impl ValueRange {
    pub const fn new(min: i64, max: i64) -> Self {
        if min > max {
            panic!("property range lower bound exceeds its upper bound");
        }
        // The value travels in a single byte of the message body.
        if min < 0 || max > u8::MAX as i64 {
            panic!("property range does not fit in a single byte");
        }
        Self { min, max }
    }

    pub const fn min(&self) -> i64 {
        self.min
    }

    pub const fn max(&self) -> i64 {
        self.max
    }

    pub const fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}..={}", self.min, self.max))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{value} is not within the legal range of `{property}`, which is {range}")]
pub struct OutOfRange {
    pub property: &'static str,
    pub value: i64,
    pub range: ValueRange,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid property `{name}`, valid options: {valid}")]
    UnknownProperty { name: String, valid: String },
}

#[derive(Debug, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    /// Selector of the setting in the monitor firmware.
    pub code: u16,
    pub range: ValueRange,
    pub description: &'static str,
}

impl Property {
    /// Check `value` against the range of this property and narrow it to the byte that goes on
    /// the wire.
    ///
    /// This is the only validation routine: command line handling and the packet encoder both
    /// go through it.
    pub fn validate(&self, value: i64) -> Result<u8, OutOfRange> {
        let out_of_range = || OutOfRange { property: self.name, value, range: self.range };
        if !self.range.contains(value) {
            return Err(out_of_range());
        }
        u8::try_from(value).map_err(|_| out_of_range())
    }

    pub fn is_match(&self, pattern: &str) -> bool {
        let pattern = pattern.to_lowercase();
        if self.name.contains(&pattern) {
            return true;
        }
        if self.description.to_lowercase().contains(&pattern) {
            return true;
        }
        if format!("{:#06x}", self.code).contains(&pattern) {
            return true;
        }
        return self.code.to_string() == pattern;
    }
}

macro_rules! for_each_property {
    ($m:ident) => {
        $m! {
            0x0010, "brightness", min = 0, max = 100;
            0x0012, "contrast", min = 0, max = 100;
            0x0087, "sharpness", min = 0, max = 10;
            0xe00b, "low-blue-light", min = 0, max = 10,
                "Blue light reduction. 0 means no reduction";
            0xe069, "kvm-switch", min = 0, max = 1,
                "Switch KVM to device 0 or 1";
            0xe003, "colour-mode", min = 0, max = 3,
                "0 is cool, 1 is normal, 2 is warm, 3 is user-defined";
            0xe004, "rgb-red", min = 0, max = 100,
                "Red value, only effective if colour-mode is set to 3";
            0xe005, "rgb-green", min = 0, max = 100,
                "Green value, only effective if colour-mode is set to 3";
            0xe006, "rgb-blue", min = 0, max = 100,
                "Blue value, only effective if colour-mode is set to 3";
        }
    };
}

macro_rules! description {
    () => {
        ""
    };
    ($description: literal) => {
        $description
    };
}

macro_rules! make_table {
    ($($code: literal, $name: literal, min = $min: literal, max = $max: literal $(, $description: literal)?;)+) => {
        const TABLE: &[Property] = &[$(
            Property {
                name: $name,
                code: $code,
                range: ValueRange::new($min, $max),
                description: description!($($description)?),
            }
        ),*];
    };
}

for_each_property!(make_table);

const _: () = {
    const fn same_name(a: &str, b: &str) -> bool {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        if a.len() != b.len() {
            return false;
        }
        let mut index = 0;
        while index < a.len() {
            if a[index] != b[index] {
                return false;
            }
            index += 1;
        }
        true
    }

    let mut i = 0;
    while i < TABLE.len() {
        let mut j = i + 1;
        while j < TABLE.len() {
            if same_name(TABLE[i].name, TABLE[j].name) {
                panic!("property names must be unique!");
            }
            j += 1;
        }
        i += 1;
    }
};

/// All known properties, in registration order.
pub static PROPERTIES: &[Property] = TABLE;

pub fn lookup(name: &str) -> Result<&'static Property, Error> {
    PROPERTIES.iter().find(|p| p.name == name).ok_or_else(|| Error::UnknownProperty {
        name: name.to_string(),
        valid: names().collect::<Vec<_>>().join(", "),
    })
}

pub fn names() -> impl Iterator<Item = &'static str> + Clone {
    PROPERTIES.iter().map(|p| p.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &[(&str, u16, i64, i64)] = &[
        ("brightness", 0x10, 0, 100),
        ("contrast", 0x12, 0, 100),
        ("sharpness", 0x87, 0, 10),
        ("low-blue-light", 0xe00b, 0, 10),
        ("kvm-switch", 0xe069, 0, 1),
        ("colour-mode", 0xe003, 0, 3),
        ("rgb-red", 0xe004, 0, 100),
        ("rgb-green", 0xe005, 0, 100),
        ("rgb-blue", 0xe006, 0, 100),
    ];

    #[test]
    fn reference_table_is_registered() {
        for &(name, code, min, max) in REFERENCE {
            let property = lookup(name).unwrap();
            assert_eq!(property.name, name);
            assert_eq!(property.code, code, "{name}");
            assert_eq!(property.range.min(), min, "{name}");
            assert_eq!(property.range.max(), max, "{name}");
        }
        assert_eq!(PROPERTIES.len(), REFERENCE.len());
    }

    #[test]
    fn names_follow_registration_order() {
        let names = names().collect::<Vec<_>>();
        let expected = REFERENCE.iter().map(|r| r.0).collect::<Vec<_>>();
        assert_eq!(names, expected);
    }

    #[test]
    fn unknown_property() {
        let Err(Error::UnknownProperty { name, valid }) = lookup("gamma") else {
            panic!("gamma should not be a known property");
        };
        assert_eq!(name, "gamma");
        assert!(valid.starts_with("brightness, contrast"));
        assert!(valid.ends_with("rgb-blue"));
        assert!(lookup("Brightness").is_err());
        assert!(lookup("").is_err());
    }

    #[test]
    fn validate_accepts_the_whole_range() {
        for property in PROPERTIES {
            for value in property.range.min()..=property.range.max() {
                assert_eq!(property.validate(value), Ok(value as u8));
            }
        }
    }

    #[test]
    fn validate_rejects_both_boundaries() {
        for property in PROPERTIES {
            for value in [property.range.min() - 1, property.range.max() + 1] {
                let error = property.validate(value).unwrap_err();
                assert_eq!(error.property, property.name);
                assert_eq!(error.value, value);
                assert_eq!(error.range, property.range);
            }
        }
    }

    #[test]
    fn out_of_range_message() {
        let error = lookup("kvm-switch").unwrap().validate(2).unwrap_err();
        assert_eq!(error.to_string(), "2 is not within the legal range of `kvm-switch`, which is 0..=1");
    }

    #[test]
    fn matching() {
        let kvm = lookup("kvm-switch").unwrap();
        assert!(kvm.is_match("KVM"));
        assert!(kvm.is_match("device 0"));
        assert!(kvm.is_match("0xe069"));
        assert!(kvm.is_match(&0xe069.to_string()));
        assert!(!kvm.is_match("colour"));
        assert!(lookup("rgb-blue").unwrap().is_match("colour-mode"));
    }
}
