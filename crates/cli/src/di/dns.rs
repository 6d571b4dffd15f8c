use hexcamp_application::ports::{DnsHandler, UpstreamLookup};
use hexcamp_application::use_cases::SynthesizeCellAnswerUseCase;
use hexcamp_domain::config::LookupMode;
use hexcamp_domain::{Config, QueryNameMatcher};
use hexcamp_infrastructure::dns::{
    ChainLookup, ForwardHandler, ForwardLookup, HandlerChain, HandlerStats, HexcampHandler,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub chain: Arc<HandlerChain>,
    pub stats: Arc<HandlerStats>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let matcher = QueryNameMatcher::new(&config.hexcamp.domain)?;
        let servers = config.upstream.socket_addrs().map_err(anyhow::Error::msg)?;
        let forward_lookup = Arc::new(ForwardLookup::new(
            servers,
            Duration::from_millis(config.upstream.timeout_ms),
        ));
        let stats = Arc::new(HandlerStats::new());

        // The chain lookup needs a handle on the chain it lives in.
        let chain = Arc::new_cyclic(|chain| {
            let lookup: Arc<dyn UpstreamLookup> = match config.upstream.lookup {
                LookupMode::Chain => Arc::new(ChainLookup::new(chain.clone())),
                LookupMode::Direct => forward_lookup.clone(),
            };
            let use_case = Arc::new(SynthesizeCellAnswerUseCase::new(matcher, lookup));

            let mut handlers: Vec<Arc<dyn DnsHandler>> =
                vec![Arc::new(HexcampHandler::new(use_case, stats.clone()))];
            if config.upstream.forward_unmatched {
                handlers.push(Arc::new(ForwardHandler::new(forward_lookup.clone())));
            }
            HandlerChain::new(handlers)
        });

        info!(
            handlers = ?chain.handler_names(),
            lookup = ?config.upstream.lookup,
            upstreams = forward_lookup.servers().len(),
            "Handler chain ready"
        );

        Ok(Self { chain, stats })
    }
}
