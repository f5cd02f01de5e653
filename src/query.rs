use std::net::SocketAddr;

use log::debug;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{timeout_at, Instant};

use crate::error::SourceQueryError;
use crate::info::ServerInfo;
use crate::packet::{
    QueryKind, RequestPacket, ResponsePacket, ResponseType, MAX_PACKET_SIZE,
};
use crate::players::{parse_players, PlayerEntry};

/// Retry budget per query: a challenge reply, a bad datagram or an I/O error
/// each consume one round.
pub const MAX_ROUNDS: usize = 5;

/// Per-query settings shared by both query kinds.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Absolute deadline applied to every socket operation of the query.
    pub deadline: Instant,
    /// When set, a reply with an unexpected (non-challenge) type code fails
    /// the query immediately instead of spending a retry round. Off by
    /// default: a shared game port can deliver unrelated datagrams, and
    /// waiting out the budget tolerates them.
    pub strict: bool,
}

impl QueryOptions {
    pub fn new(deadline: Instant) -> Self {
        QueryOptions {
            deadline,
            strict: false,
        }
    }
}

/// Query `host` for its A2S_INFO snapshot.
pub async fn query_info(
    host: &str,
    options: &QueryOptions,
) -> Result<ServerInfo, SourceQueryError> {
    let body = query_raw(host, QueryKind::Info, options).await?;
    ServerInfo::parse(&body)
}

/// Query `host` for its A2S_PLAYER roster, in wire order.
pub async fn query_players(
    host: &str,
    options: &QueryOptions,
) -> Result<Vec<PlayerEntry>, SourceQueryError> {
    let body = query_raw(host, QueryKind::Players, options).await?;
    parse_players(&body)
}

/// One round's classified outcome.
enum Exchange {
    /// The reply matching the query kind; carries its body.
    Payload(Vec<u8>),
    /// The server wants this token echoed before it answers.
    Challenged([u8; 4]),
}

/// Run the challenge-response loop for one query against one server.
///
/// Up to [`MAX_ROUNDS`] rounds of send/receive. A challenge reply updates
/// the token slot and goes again; deadline expiry returns immediately; any
/// other failure is recorded and retried until the budget runs out, at which
/// point the last recorded failure is surfaced inside `RetriesExhausted`.
async fn query_raw(
    host: &str,
    kind: QueryKind,
    options: &QueryOptions,
) -> Result<Vec<u8>, SourceQueryError> {
    let addr = resolve(host).await?;

    // just arbitrarily bind any port, doesn't matter really
    let sock = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(SourceQueryError::FailedPortBind)?;
    sock.connect(addr)
        .await
        .map_err(SourceQueryError::UnreachableHost)?;

    let mut challenge: Option<[u8; 4]> = kind.initial_challenge();
    let mut last_error: Option<SourceQueryError> = None;

    for attempt in 1..=MAX_ROUNDS {
        match exchange(&sock, kind, challenge, options.deadline).await {
            Ok(Exchange::Payload(body)) => return Ok(body),
            Ok(Exchange::Challenged(token)) => {
                debug!("{host}: challenged on attempt {attempt}, echoing token");
                challenge = Some(token);
                last_error = Some(SourceQueryError::UnexpectedResponseType {
                    expected: kind.expected_response().as_char(),
                    got: ResponseType::Challenge.as_char(),
                });
            }
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err @ SourceQueryError::UnexpectedResponseType { .. }) if options.strict => {
                return Err(err)
            }
            Err(err) => {
                debug!("{host}: attempt {attempt} failed: {err}");
                last_error = Some(err);
            }
        }
    }

    Err(SourceQueryError::RetriesExhausted {
        attempts: MAX_ROUNDS,
        source: Box::new(last_error.unwrap_or(SourceQueryError::TruncatedData)),
    })
}

/// Send the current request and classify the single datagram that comes
/// back. No reassembly: a split-packet header fails the attempt.
async fn exchange(
    sock: &UdpSocket,
    kind: QueryKind,
    challenge: Option<[u8; 4]>,
    deadline: Instant,
) -> Result<Exchange, SourceQueryError> {
    let request = RequestPacket::new(kind, challenge).pack();
    timeout_at(deadline, sock.send(&request))
        .await?
        .map_err(SourceQueryError::SendError)?;

    let mut resp_buf = [0u8; MAX_PACKET_SIZE];
    let len = timeout_at(deadline, sock.recv(&mut resp_buf))
        .await?
        .map_err(SourceQueryError::ReceiveError)?;

    let packet = ResponsePacket::unpack(&resp_buf[..len])?;
    match packet.response_type() {
        ResponseType::Challenge => Ok(Exchange::Challenged(packet.challenge_token()?)),
        t if t == kind.expected_response() => Ok(Exchange::Payload(packet.into_body())),
        t => Err(SourceQueryError::UnexpectedResponseType {
            expected: kind.expected_response().as_char(),
            got: t.as_char(),
        }),
    }
}

async fn resolve(host: &str) -> Result<SocketAddr, SourceQueryError> {
    lookup_host(host)
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| SourceQueryError::AddressResolutionFailed(host.to_owned()))
}
