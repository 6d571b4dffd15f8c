use hexcamp_application::RequestContext;
use hexcamp_infrastructure::dns::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use hexcamp_infrastructure::dns::transport::udp::MAX_UDP_RESPONSE_SIZE;
use hexcamp_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct ServerSettings {
    pub request_timeout: Duration,
    pub tcp_idle_timeout: Duration,
}

/// Serves UDP and TCP on `socket_addr` until `shutdown` is cancelled.
pub async fn start_dns_server(
    socket_addr: SocketAddr,
    handler: DnsServerHandler,
    settings: ServerSettings,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
    let tcp_listener = create_tcp_listener(domain, socket_addr)?;

    let handler = Arc::new(handler);
    let mut join_set: JoinSet<()> = JoinSet::new();

    join_set.spawn(run_udp_worker(
        udp_socket,
        handler.clone(),
        settings,
        shutdown.clone(),
    ));
    join_set.spawn(run_tcp_acceptor(
        tcp_listener,
        handler,
        settings,
        shutdown.clone(),
    ));

    info!(bind_address = %socket_addr, "DNS server ready (UDP + TCP)");

    while join_set.join_next().await.is_some() {}
    Ok(())
}

async fn run_udp_worker(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    settings: ServerSettings,
    shutdown: CancellationToken,
) {
    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = socket.recv_from(&mut recv_buf) => match result {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let packet: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let socket = socket.clone();
        let ctx = RequestContext::with_parent(settings.request_timeout, &shutdown);

        tokio::spawn(async move {
            if let Some(response) = handler.handle_raw(&ctx, &packet, from.ip()).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    error!(client = %from, error = %e, "Failed to send UDP response");
                }
            }
        });
    }

    debug!("UDP worker stopped");
}

async fn run_tcp_acceptor(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    settings: ServerSettings,
    shutdown: CancellationToken,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = listener.accept() => match result {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            serve_tcp_connection(stream, peer, handler, settings, shutdown).await;
        });
    }

    debug!("TCP acceptor stopped");
}

/// One request at a time per connection; the connection closes after
/// `tcp_idle_timeout` without a new request.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<DnsServerHandler>,
    settings: ServerSettings,
    shutdown: CancellationToken,
) {
    loop {
        let packet = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = tokio::time::timeout(settings.tcp_idle_timeout, read_with_length_prefix(&mut stream)) => match result {
                Ok(Ok(packet)) => packet,
                Ok(Err(e)) => {
                    debug!(client = %peer, error = %e, "TCP connection closed");
                    break;
                }
                Err(_) => {
                    debug!(client = %peer, "TCP connection idle, closing");
                    break;
                }
            },
        };

        let ctx = RequestContext::with_parent(settings.request_timeout, &shutdown);
        let Some(response) = handler.handle_raw(&ctx, &packet, peer.ip()).await else {
            continue;
        };

        if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
            error!(client = %peer, error = %e, "Failed to send TCP response");
            break;
        }
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
