use log::warn;

use crate::error::SourceQueryError;
use crate::info::ServerInfo;
use crate::players::PlayerEntry;
use crate::query::{query_info, query_players, QueryOptions};

/// Both outcomes for one server. The two query kinds fail independently: a
/// dead players query does not invalidate a decoded info snapshot.
#[derive(Debug)]
pub struct ServerStatus {
    pub info: Result<ServerInfo, SourceQueryError>,
    pub players: Result<Vec<PlayerEntry>, SourceQueryError>,
}

/// Query every server concurrently under one shared deadline.
///
/// One task per server, each running its two query kinds in parallel. All
/// tasks are awaited; results land in slots matching the input order, so the
/// rendered table follows the configured order no matter which server
/// answered first.
pub async fn query_all(hosts: &[String], options: QueryOptions) -> Vec<ServerStatus> {
    let mut handles = Vec::with_capacity(hosts.len());
    for host in hosts {
        let host = host.clone();
        handles.push(tokio::spawn(async move {
            let (info, players) = tokio::join!(
                query_info(&host, &options),
                query_players(&host, &options),
            );
            ServerStatus { info, players }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (i, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(status) => results.push(status),
            Err(err) => {
                warn!("query task for {} died: {err}", hosts[i]);
                results.push(ServerStatus {
                    info: Err(SourceQueryError::Worker(err.to_string())),
                    players: Err(SourceQueryError::Worker(err.to_string())),
                });
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::UdpSocket;
    use tokio::time::Instant;

    use super::*;
    use crate::packet::MAX_PACKET_SIZE;

    /// Answers info and players queries by command byte, like a real server.
    async fn game_server(players: &[&str]) -> std::net::SocketAddr {
        let mut info_reply = b"\xFF\xFF\xFF\xFFI\x11srv\0map\0tf\0game\0".to_vec();
        info_reply.extend_from_slice(&440u16.to_le_bytes());
        info_reply.extend_from_slice(&[players.len() as u8, 24, 0, b'd', b'l', 0, 1]);

        let mut players_reply = b"\xFF\xFF\xFF\xFFD".to_vec();
        players_reply.push(players.len() as u8);
        for (i, name) in players.iter().enumerate() {
            players_reply.push(i as u8);
            players_reply.extend_from_slice(name.as_bytes());
            players_reply.push(0);
            players_reply.extend_from_slice(&0u32.to_le_bytes());
            players_reply.extend_from_slice(&0f32.to_le_bytes());
        }

        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sock.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; MAX_PACKET_SIZE];
            loop {
                let (len, peer) = match sock.recv_from(&mut buf).await {
                    Ok(r) => r,
                    Err(_) => return,
                };
                let reply = match buf[..len].get(4) {
                    Some(0x54) => &info_reply,
                    Some(0x55) => &players_reply,
                    _ => continue,
                };
                let _ = sock.send_to(reply, peer).await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn results_keep_configured_order_and_fail_independently() {
        let live = game_server(&["alpha", "beta"]).await;
        // silent: bound, never answers
        let silent_sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let silent = silent_sock.local_addr().unwrap();

        let hosts = vec![silent.to_string(), live.to_string()];
        let options = QueryOptions::new(Instant::now() + Duration::from_millis(300));
        let results = query_all(&hosts, options).await;

        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0].info,
            Err(SourceQueryError::TimedOut(_))
        ));
        assert!(matches!(
            results[0].players,
            Err(SourceQueryError::TimedOut(_))
        ));

        let info = results[1].info.as_ref().unwrap();
        assert_eq!(info.name, "srv");
        let players = results[1].players.as_ref().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "alpha");
    }
}
