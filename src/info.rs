use crate::cursor::PacketCursor;
use crate::error::SourceQueryError;

/// Server information as obtained by [`query_info`].
///
/// [`query_info`]: crate::query::query_info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Server hostname
    pub name: String,
    /// Current map
    pub map: String,
    /// Name of game
    pub game: String,
    /// Current players, bots included
    pub players: u8,
    /// Max players
    pub max_players: u8,
    /// Current bots
    pub bots: u8,
    /// Server type:
    /// - `d`: Dedicated
    /// - `l`: Listen (non-dedicated)
    /// - `p`: SourceTV relay (proxy)
    pub server_type: char,
    /// Server environment:
    /// - `l`: Linux
    /// - `w`: Windows
    /// - `o`: Mac
    pub server_env: char,
    /// Is the server password protected?
    pub password_protected: bool,
    /// Is the server VAC enabled?
    pub vac_enabled: bool,
}

impl ServerInfo {
    /// Parse the body of an A2S_INFO reply (everything after the `'I'` type
    /// code). Fields are consumed in wire order; the protocol version,
    /// folder, app id and anything past the VAC flag are discarded.
    pub fn parse(body: &[u8]) -> Result<ServerInfo, SourceQueryError> {
        let mut cursor = PacketCursor::new(body);

        cursor.read_u8()?; // protocol version
        let name = cursor.read_cstring()?;
        let map = cursor.read_cstring()?;
        cursor.read_cstring()?; // folder
        let game = cursor.read_cstring()?;
        cursor.read_u16_le()?; // app id
        let players = cursor.read_u8()?;
        let max_players = cursor.read_u8()?;
        let bots = cursor.read_u8()?;
        let server_type = char::from(cursor.read_u8()?);
        let server_env = char::from(cursor.read_u8()?);
        let password_protected = cursor.read_bool()?;
        let vac_enabled = cursor.read_bool()?;

        Ok(ServerInfo {
            name,
            map,
            game,
            players,
            max_players,
            bots,
            server_type,
            server_env,
            password_protected,
            vac_enabled,
        })
    }

    /// Player count with bots excluded.
    pub fn human_players(&self) -> u8 {
        self.players.saturating_sub(self.bots)
    }
}
