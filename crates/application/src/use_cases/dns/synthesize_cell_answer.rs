use crate::ports::UpstreamLookup;
use crate::services::LookupClass;
use crate::RequestContext;
use hexcamp_domain::{
    decode_identifier, CanonicalName, CellAddress, DnsRequest, DomainError, NameMatch,
    QueryNameMatcher, SynthesisPlan,
};
use hickory_proto::rr::rdata::CNAME;
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

const CNAME_TTL: u32 = 0;

/// Why a request was handed to the next handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    CanonicalOrigin,
    UnsupportedType,
    NoMatch,
    UndecodableIdentifier,
    InvalidCell,
    InvalidName,
}

impl DeferReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeferReason::CanonicalOrigin => "canonical_origin",
            DeferReason::UnsupportedType => "unsupported_type",
            DeferReason::NoMatch => "no_match",
            DeferReason::UndecodableIdentifier => "undecodable_identifier",
            DeferReason::InvalidCell => "invalid_cell",
            DeferReason::InvalidName => "invalid_name",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CellAnswer {
    pub canonical_name: CanonicalName,
    /// The CNAME first, then whatever the lookup returned.
    pub answers: Vec<Record>,
    /// `None` for CNAME queries, which never trigger a lookup.
    pub lookup: Option<LookupClass>,
}

#[derive(Debug, Clone)]
pub enum Synthesis {
    Deferred(DeferReason),
    Answered(CellAnswer),
}

pub struct SynthesizeCellAnswerUseCase {
    matcher: QueryNameMatcher,
    lookup: Arc<dyn UpstreamLookup>,
}

impl SynthesizeCellAnswerUseCase {
    pub fn new(matcher: QueryNameMatcher, lookup: Arc<dyn UpstreamLookup>) -> Self {
        Self { matcher, lookup }
    }

    pub fn suffix(&self) -> &str {
        self.matcher.suffix()
    }

    /// Decide how `request` is answered.
    ///
    /// Only a finished request scope (deadline or cancellation) is an error;
    /// everything else either defers or produces an answer.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
    ) -> Result<Synthesis, DomainError> {
        if request.is_canonical() {
            return Ok(Synthesis::Deferred(DeferReason::CanonicalOrigin));
        }

        let plan = request.record_type.synthesis_plan();
        if plan == SynthesisPlan::Unsupported {
            return Ok(Synthesis::Deferred(DeferReason::UnsupportedType));
        }

        let Some(name_match) = self.matcher.match_name(&request.domain) else {
            return Ok(Synthesis::Deferred(DeferReason::NoMatch));
        };

        let canonical_name = match self.canonical_name(&name_match) {
            Ok(name) => name,
            Err(e) => {
                debug!(domain = %request.domain, error = %e, "Identifier not decodable, deferring");
                let reason = match e {
                    DomainError::InvalidIdentifier(_) => DeferReason::UndecodableIdentifier,
                    _ => DeferReason::InvalidCell,
                };
                return Ok(Synthesis::Deferred(reason));
            }
        };

        let cname = match cname_record(request, &canonical_name) {
            Ok(record) => record,
            Err(e) => {
                debug!(domain = %request.domain, error = %e, "Canonical name not representable, deferring");
                return Ok(Synthesis::Deferred(DeferReason::InvalidName));
            }
        };

        let mut answers = vec![cname];
        let lookup = match plan {
            SynthesisPlan::CnameWithLookup => {
                let (records, class) = self.resolve_target(ctx, request, &canonical_name).await?;
                answers.extend(records);
                Some(class)
            }
            _ => None,
        };

        info!(
            domain = %request.domain,
            target = %canonical_name,
            record_type = %request.record_type,
            answers = answers.len(),
            lookup = ?lookup,
            "Synthesized geocell answer"
        );

        Ok(Synthesis::Answered(CellAnswer {
            canonical_name,
            answers,
            lookup,
        }))
    }

    fn canonical_name(&self, name_match: &NameMatch) -> Result<CanonicalName, DomainError> {
        let buffer = decode_identifier(&name_match.identifier)?;
        let address = CellAddress::from_decoded(&buffer)?;
        let path = address.path_segments()?;

        debug!(
            identifier = %name_match.identifier,
            cell = %address,
            resolution = address.resolution(),
            base_cell = address.base_cell(),
            "Decoded geocell identifier"
        );

        Ok(CanonicalName::new(
            &name_match.prefix,
            &path,
            self.matcher.suffix(),
        ))
    }

    /// One lookup of the canonical name. Its records are appended whatever
    /// the outcome; only a finished request scope aborts.
    async fn resolve_target(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        canonical_name: &CanonicalName,
    ) -> Result<(Vec<Record>, LookupClass), DomainError> {
        let result = self
            .lookup
            .lookup(ctx, request, canonical_name.as_str(), request.record_type)
            .await;

        if let Some(abort) = ctx.done_error() {
            warn!(target = %canonical_name, error = %abort, "Request finished during lookup");
            return Err(abort);
        }

        let class = LookupClass::classify(&result);
        let records = match result {
            Ok(Some(message)) => message.answers().to_vec(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(target = %canonical_name, error = %e, "Upstream lookup failed");
                Vec::new()
            }
        };

        debug!(
            target = %canonical_name,
            class = %class,
            records = records.len(),
            "Upstream lookup finished"
        );

        Ok((records, class))
    }
}

fn cname_record(request: &DnsRequest, target: &CanonicalName) -> Result<Record, DomainError> {
    let owner = fqdn(&request.domain)?;
    let target = fqdn(target.as_str())?;

    let mut record = Record::from_rdata(owner, CNAME_TTL, RData::CNAME(CNAME(target)));
    record.set_dns_class(DNSClass::from(request.dns_class));
    Ok(record)
}

fn fqdn(name: &str) -> Result<Name, DomainError> {
    let mut parsed = Name::from_str(name)
        .map_err(|e| DomainError::InvalidDomainName(format!("'{}': {}", name, e)))?;
    parsed.set_fqdn(true);
    Ok(parsed)
}
