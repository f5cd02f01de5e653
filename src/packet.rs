use crate::cursor::PacketCursor;
use crate::error::SourceQueryError;

/// According to the Valve wiki, Source query responses use 1400 bytes + IP/UDP headers.
pub const MAX_PACKET_SIZE: usize = 1400;

/// Every request, and every single-datagram reply, starts with this prefix.
const SINGLE_HEADER: u32 = 0xFFFF_FFFF;
/// Prefix of a reply fragmented across datagrams. Reassembly is out of scope;
/// encountering one fails the attempt outright.
const SPLIT_HEADER: u32 = 0xFFFF_FFFE;

#[derive(Debug, PartialEq, Eq)]
pub enum PacketHeader {
    Single,
    Split,
}

impl TryFrom<u32> for PacketHeader {
    type Error = SourceQueryError;

    fn try_from(raw: u32) -> Result<PacketHeader, Self::Error> {
        match raw {
            SINGLE_HEADER => Ok(PacketHeader::Single),
            SPLIT_HEADER => Ok(PacketHeader::Split),
            n => Err(SourceQueryError::UnknownPacketHeader(n)),
        }
    }
}

/// Reply type codes the protocol can send us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// S2C_CHALLENGE (`'A'`): carries a 4-byte token to echo in the retried
    /// request.
    Challenge,
    /// A2S_INFO reply (`'I'`), parsed by [`ServerInfo::parse`].
    ///
    /// [`ServerInfo::parse`]: crate::info::ServerInfo::parse
    Info,
    /// A2S_PLAYER reply (`'D'`), parsed by [`parse_players`].
    ///
    /// [`parse_players`]: crate::players::parse_players
    Players,
}

impl TryFrom<u8> for ResponseType {
    type Error = SourceQueryError;

    fn try_from(raw: u8) -> Result<ResponseType, Self::Error> {
        match raw {
            b'A' => Ok(ResponseType::Challenge),
            b'I' => Ok(ResponseType::Info),
            b'D' => Ok(ResponseType::Players),
            n => Err(SourceQueryError::UnknownResponseType(n)),
        }
    }
}

impl ResponseType {
    pub fn as_char(&self) -> char {
        match self {
            ResponseType::Challenge => 'A',
            ResponseType::Info => 'I',
            ResponseType::Players => 'D',
        }
    }
}

/// The two queries we know how to issue. Selects the request payload layout
/// and the reply type code that counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Info,
    Players,
}

impl QueryKind {
    pub fn command_byte(&self) -> u8 {
        match self {
            QueryKind::Info => 0x54,    // A2S_INFO 'T'
            QueryKind::Players => 0x55, // A2S_PLAYER 'U'
        }
    }

    pub fn expected_response(&self) -> ResponseType {
        match self {
            QueryKind::Info => ResponseType::Info,
            QueryKind::Players => ResponseType::Players,
        }
    }

    /// The challenge slot a fresh query starts with. A2S_PLAYER always
    /// carries one, initially all `0xFF`; A2S_INFO appends one only after
    /// being challenged.
    pub fn initial_challenge(&self) -> Option<[u8; 4]> {
        match self {
            QueryKind::Info => None,
            QueryKind::Players => Some([0xFF; 4]),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RequestPacket {
    kind: QueryKind,
    challenge: Option<[u8; 4]>,
}

impl RequestPacket {
    pub fn new(kind: QueryKind, challenge: Option<[u8; 4]>) -> Self {
        RequestPacket { kind, challenge }
    }

    /// Serializes the request into its wire form.
    pub fn pack(&self) -> Vec<u8> {
        // packet structure: header, command, body (info only), challenge
        let mut payload: Vec<u8> = Vec::new();
        payload.extend_from_slice(&SINGLE_HEADER.to_le_bytes());
        payload.push(self.kind.command_byte());
        if self.kind == QueryKind::Info {
            payload.extend_from_slice(b"Source Engine Query");
            payload.push(0);
        }
        if let Some(challenge) = &self.challenge {
            payload.extend_from_slice(challenge);
        }

        payload
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResponsePacket {
    response_type: ResponseType,
    body: Vec<u8>,
}

impl ResponsePacket {
    /// Deserializes an incoming datagram, splitting it into header, type code
    /// and body. Split-packet headers are rejected, not reassembled.
    pub fn unpack(incoming: &[u8]) -> Result<Self, SourceQueryError> {
        let mut cursor = PacketCursor::new(incoming);

        let header: PacketHeader = cursor.read_u32_le()?.try_into()?;
        if header == PacketHeader::Split {
            return Err(SourceQueryError::SplitPacket);
        }

        let response_type: ResponseType = cursor.read_u8()?.try_into()?;
        let body = cursor.read_bytes(cursor.remaining())?.to_vec();

        Ok(ResponsePacket {
            response_type,
            body,
        })
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// The 4-byte token of a [`ResponseType::Challenge`] reply.
    pub fn challenge_token(&self) -> Result<[u8; 4], SourceQueryError> {
        let mut cursor = PacketCursor::new(&self.body);
        Ok(cursor.read_bytes(4)?.try_into()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_request_wire_form() {
        let packet = RequestPacket::new(QueryKind::Info, None);
        assert_eq!(packet.pack(), b"\xFF\xFF\xFF\xFFTSource Engine Query\x00");
    }

    #[test]
    fn info_request_with_challenge_appended() {
        let packet = RequestPacket::new(QueryKind::Info, Some([1, 2, 3, 4]));
        assert_eq!(
            packet.pack(),
            b"\xFF\xFF\xFF\xFFTSource Engine Query\x00\x01\x02\x03\x04"
        );
    }

    #[test]
    fn players_request_carries_placeholder_challenge() {
        let packet = RequestPacket::new(QueryKind::Players, QueryKind::Players.initial_challenge());
        assert_eq!(packet.pack(), b"\xFF\xFF\xFF\xFFU\xFF\xFF\xFF\xFF");
    }

    #[test]
    fn unpack_challenge_reply() {
        let packet = ResponsePacket::unpack(b"\xFF\xFF\xFF\xFFA\xDE\xAD\xBE\xEF").unwrap();
        assert_eq!(packet.response_type(), ResponseType::Challenge);
        assert_eq!(packet.challenge_token().unwrap(), [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn unpack_rejects_split_header() {
        let err = ResponsePacket::unpack(b"\xFE\xFF\xFF\xFFIrest").unwrap_err();
        assert!(matches!(err, SourceQueryError::SplitPacket));
    }

    #[test]
    fn unpack_rejects_unknown_header() {
        let err = ResponsePacket::unpack(b"\x00\x01\x02\x03Irest").unwrap_err();
        assert!(matches!(err, SourceQueryError::UnknownPacketHeader(_)));
    }

    #[test]
    fn unpack_rejects_unknown_type_code() {
        let err = ResponsePacket::unpack(b"\xFF\xFF\xFF\xFFZ").unwrap_err();
        assert!(matches!(err, SourceQueryError::UnknownResponseType(b'Z')));
    }

    #[test]
    fn unpack_truncated_datagram() {
        let err = ResponsePacket::unpack(b"\xFF\xFF").unwrap_err();
        assert!(matches!(err, SourceQueryError::TruncatedData));
    }

    #[test]
    fn truncated_challenge_token() {
        let packet = ResponsePacket::unpack(b"\xFF\xFF\xFF\xFFA\x01\x02").unwrap();
        assert!(matches!(
            packet.challenge_token(),
            Err(SourceQueryError::TruncatedData)
        ));
    }
}
