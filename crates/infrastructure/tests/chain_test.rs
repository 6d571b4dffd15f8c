use hexcamp_application::ports::{DnsHandler, HandlerStatus, UpstreamLookup};
use hexcamp_domain::{DnsRequest, DomainError, QueryOrigin, RecordType};
use hexcamp_infrastructure::dns::{BufferedResponseWriter, ChainLookup, HandlerChain};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{RData, RecordType as HickoryRecordType};
use std::net::Ipv4Addr;
use std::sync::Arc;

mod helpers;
use helpers::{
    a_record, client_ip, ctx, hexcamp_handler, query, FailingHandler, RecordingHandler,
    StaticLookup, REFERENCE_NAME, REFERENCE_TARGET,
};

// ── dispatch ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_first_handled_stops_dispatch() {
    let first = Arc::new(RecordingHandler::answering(vec![]));
    let second = Arc::new(RecordingHandler::answering(vec![]));
    let handlers: Vec<Arc<dyn DnsHandler>> = vec![first.clone(), second.clone()];
    let chain = HandlerChain::new(handlers);
    let message = query("example.com.", RecordType::A);
    let mut writer = BufferedResponseWriter::new();

    let status = chain.serve(&ctx(), &message, client_ip(), &mut writer).await.unwrap();

    assert_eq!(status, HandlerStatus::Handled);
    assert_eq!(first.seen().len(), 1);
    assert!(second.seen().is_empty());
}

#[tokio::test]
async fn test_deferral_moves_to_next_handler() {
    let first = Arc::new(RecordingHandler::deferring());
    let second = Arc::new(RecordingHandler::answering(vec![]));
    let handlers: Vec<Arc<dyn DnsHandler>> = vec![first.clone(), second.clone()];
    let chain = HandlerChain::new(handlers);
    let message = query("example.com.", RecordType::A);
    let mut writer = BufferedResponseWriter::new();

    chain.serve(&ctx(), &message, client_ip(), &mut writer).await.unwrap();

    assert_eq!(first.seen().len(), 1);
    assert_eq!(
        second.seen(),
        vec![("example.com.".to_string(), QueryOrigin::Client)]
    );
}

#[tokio::test]
async fn test_no_next_handler_writes_servfail() {
    let handlers: Vec<Arc<dyn DnsHandler>> = vec![Arc::new(RecordingHandler::deferring())];
    let chain = HandlerChain::new(handlers);
    let message = query("example.com.", RecordType::A);
    let mut writer = BufferedResponseWriter::new();

    let result = chain.serve(&ctx(), &message, client_ip(), &mut writer).await;

    assert!(matches!(result, Err(DomainError::NoNextHandler(_))));
    let reply = writer.into_message().unwrap();
    assert_eq!(reply.id(), message.id());
    assert_eq!(reply.response_code(), ResponseCode::ServFail);
}

#[tokio::test]
async fn test_marker_name_falls_through_to_servfail() {
    let (hexcamp, _) = hexcamp_handler(Arc::new(StaticLookup::new(Ok(None))));
    let handlers: Vec<Arc<dyn DnsHandler>> = vec![hexcamp];
    let chain = HandlerChain::new(handlers);
    let message = query("anything.h3.test.hex.camp.", RecordType::A);
    let mut writer = BufferedResponseWriter::new();

    let result = chain.serve(&ctx(), &message, client_ip(), &mut writer).await;

    assert!(matches!(result, Err(DomainError::NoNextHandler(_))));
    assert_eq!(
        writer.into_message().unwrap().response_code(),
        ResponseCode::ServFail
    );
}

#[tokio::test]
async fn test_handler_error_writes_servfail() {
    let handlers: Vec<Arc<dyn DnsHandler>> =
        vec![Arc::new(FailingHandler::new(DomainError::NoUpstreams))];
    let chain = HandlerChain::new(handlers);
    let message = query("example.com.", RecordType::A);
    let mut writer = BufferedResponseWriter::new();

    let result = chain.serve(&ctx(), &message, client_ip(), &mut writer).await;

    assert_eq!(result, Err(DomainError::NoUpstreams));
    assert_eq!(
        writer.into_message().unwrap().response_code(),
        ResponseCode::ServFail
    );
}

#[tokio::test]
async fn test_cancelled_handler_writes_nothing() {
    let handlers: Vec<Arc<dyn DnsHandler>> = vec![Arc::new(FailingHandler::new(DomainError::Cancelled))];
    let chain = HandlerChain::new(handlers);
    let message = query("example.com.", RecordType::A);
    let mut writer = BufferedResponseWriter::new();

    let result = chain.serve(&ctx(), &message, client_ip(), &mut writer).await;

    assert_eq!(result, Err(DomainError::Cancelled));
    assert!(!writer.is_written());
}

#[tokio::test]
async fn test_other_query_types_reach_next_handler() {
    for code in [
        HickoryRecordType::DS,
        HickoryRecordType::DNSKEY,
        HickoryRecordType::NAPTR,
        HickoryRecordType::ANY,
    ] {
        let lookup = Arc::new(StaticLookup::new(Ok(None)));
        let (hexcamp, _) = hexcamp_handler(lookup.clone());
        let tail = Arc::new(RecordingHandler::answering(vec![]));
        let handlers: Vec<Arc<dyn DnsHandler>> = vec![hexcamp, tail.clone()];
        let chain = HandlerChain::new(handlers);
        let message = query(REFERENCE_NAME, RecordType::Other(u16::from(code)));
        let mut writer = BufferedResponseWriter::new();

        let status = chain.serve(&ctx(), &message, client_ip(), &mut writer).await.unwrap();

        assert_eq!(status, HandlerStatus::Handled);
        assert_eq!(
            tail.seen(),
            vec![(REFERENCE_NAME.to_string(), QueryOrigin::Client)],
            "{:?} should be deferred",
            code
        );
        assert!(lookup.calls().is_empty());
        let reply = writer.into_message().unwrap();
        assert_eq!(reply.response_code(), ResponseCode::NoError);
        assert_eq!(reply.queries()[0].query_type(), code);
    }
}

#[tokio::test]
async fn test_question_class_reaches_handlers() {
    let handlers: Vec<Arc<dyn DnsHandler>> = vec![Arc::new(RecordingHandler::answering(vec![]))];
    let chain = HandlerChain::new(handlers);
    let message = query("example.com.", RecordType::A);
    let request = DnsRequest::new("example.com.", RecordType::A, client_ip()).with_class(3);
    let mut writer = BufferedResponseWriter::new();

    let status = chain.dispatch(&ctx(), &request, &message, &mut writer).await.unwrap();
    assert_eq!(status, HandlerStatus::Handled);
}

// ── recursion through the chain ────────────────────────────────────────────

fn recursive_chain(tail: Arc<RecordingHandler>) -> Arc<HandlerChain> {
    Arc::new_cyclic(|weak| {
        let lookup: Arc<dyn UpstreamLookup> = Arc::new(ChainLookup::new(weak.clone()));
        let (hexcamp, _) = hexcamp_handler(lookup);
        let handlers: Vec<Arc<dyn DnsHandler>> = vec![hexcamp, tail];
        HandlerChain::new(handlers)
    })
}

#[tokio::test]
async fn test_chain_lookup_reaches_next_handler_as_canonical() {
    let tail = Arc::new(RecordingHandler::answering(vec![a_record(
        REFERENCE_TARGET,
        Ipv4Addr::new(192, 0, 2, 44),
    )]));
    let chain = recursive_chain(tail.clone());
    let message = query(REFERENCE_NAME, RecordType::A);
    let mut writer = BufferedResponseWriter::new();

    let status = chain.serve(&ctx(), &message, client_ip(), &mut writer).await.unwrap();

    assert_eq!(status, HandlerStatus::Handled);
    assert_eq!(
        tail.seen(),
        vec![(REFERENCE_TARGET.to_string(), QueryOrigin::Canonical)]
    );

    let reply = writer.into_message().unwrap();
    assert!(reply.authoritative());
    assert_eq!(reply.answers().len(), 2);
    match reply.answers()[0].data() {
        RData::CNAME(target) => assert_eq!(target.0.to_utf8(), REFERENCE_TARGET),
        other => panic!("expected CNAME, got {:?}", other),
    }
    assert_eq!(reply.answers()[1].record_type(), HickoryRecordType::A);
}

#[tokio::test]
async fn test_chain_lookup_without_next_handler_degrades_to_cname() {
    let tail = Arc::new(RecordingHandler::deferring());
    let chain = recursive_chain(tail.clone());
    let message = query(REFERENCE_NAME, RecordType::AAAA);
    let mut writer = BufferedResponseWriter::new();

    let status = chain.serve(&ctx(), &message, client_ip(), &mut writer).await.unwrap();

    assert_eq!(status, HandlerStatus::Handled);
    assert_eq!(tail.seen().len(), 1);
    let reply = writer.into_message().unwrap();
    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert_eq!(reply.answers().len(), 1);
}

#[tokio::test]
async fn test_chain_lookup_after_chain_dropped_is_error() {
    let chain = recursive_chain(Arc::new(RecordingHandler::deferring()));
    let lookup = ChainLookup::new(Arc::downgrade(&chain));
    drop(chain);

    let request = DnsRequest::new(REFERENCE_NAME, RecordType::A, client_ip());
    let result = lookup
        .lookup(&ctx(), &request, REFERENCE_TARGET, RecordType::A)
        .await;

    assert!(matches!(result, Err(DomainError::Transport(_))));
}
