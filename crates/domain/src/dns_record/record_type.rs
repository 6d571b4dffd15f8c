use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    SRV,
    SVCB,
    HTTPS,
    CAA,
    /// Any other wire type code (DS, DNSKEY, NAPTR, ANY, ...).
    Other(u16),
}

/// What the hexcamp handler does for a given query type once a name
/// has been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisPlan {
    /// Answer with the synthesized CNAME only.
    CnameOnly,
    /// Answer with the CNAME plus one recursive lookup of the target.
    CnameWithLookup,
    /// Not ours; hand the request to the next handler.
    Unsupported,
}

impl RecordType {
    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::CAA => 257,
            RecordType::Other(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            12 => RecordType::PTR,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            28 => RecordType::AAAA,
            33 => RecordType::SRV,
            64 => RecordType::SVCB,
            65 => RecordType::HTTPS,
            257 => RecordType::CAA,
            other => RecordType::Other(other),
        }
    }

    pub fn synthesis_plan(&self) -> SynthesisPlan {
        match self {
            RecordType::CNAME => SynthesisPlan::CnameOnly,
            RecordType::A | RecordType::AAAA | RecordType::TXT => SynthesisPlan::CnameWithLookup,
            _ => SynthesisPlan::Unsupported,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::AAAA => "AAAA",
            RecordType::SRV => "SRV",
            RecordType::SVCB => "SVCB",
            RecordType::HTTPS => "HTTPS",
            RecordType::CAA => "CAA",
            // RFC 3597 presentation form
            RecordType::Other(code) => return write!(f, "TYPE{}", code),
        };
        f.write_str(name)
    }
}
