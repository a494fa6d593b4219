//! Protobuf wire types of the QBFT light client, package `ibc.lightclients.qbft.v1`.

use ibc_proto::{google::protobuf::Any, ibc::core::client::v1::Height};

use crate::error::BesuIBCError;

/// Type URL of [`ClientState`]
pub const CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.qbft.v1.ClientState";
/// Type URL of [`ConsensusState`]
pub const CONSENSUS_STATE_TYPE_URL: &str = "/ibc.lightclients.qbft.v1.ConsensusState";
/// Type URL of [`Header`]
pub const HEADER_TYPE_URL: &str = "/ibc.lightclients.qbft.v1.Header";

#[allow(missing_docs)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientState {
    #[prost(bytes = "vec", tag = "1")]
    pub chain_id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub ibc_store_address: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub latest_height: Option<Height>,
    #[prost(uint64, tag = "4")]
    pub trusting_period: u64,
    #[prost(uint64, tag = "5")]
    pub max_clock_drift: u64,
    #[prost(string, tag = "6")]
    pub consensus_type: String,
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusState {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub root: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub validators: Vec<Vec<u8>>,
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Header {
    #[prost(bytes = "vec", tag = "1")]
    pub besu_header_rlp: Vec<u8>,
    /// Empty entries stand for validators without a seal
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub seals: Vec<Vec<u8>>,
    #[prost(message, optional, tag = "3")]
    pub trusted_height: Option<Height>,
    #[prost(bytes = "vec", tag = "4")]
    pub account_state_proof: Vec<u8>,
}

/// A protobuf message with a fixed type URL.
pub trait TypedMessage: prost::Message + Default + Sized {
    /// The type URL the message is packed under
    const TYPE_URL: &'static str;

    /// Packs the message into an [`Any`].
    fn to_any(&self) -> Any {
        Any {
            type_url: Self::TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        }
    }

    /// Unpacks the message from an [`Any`].
    /// # Errors
    /// Returns an error if the type URL does not match or the value does not decode.
    fn from_any(any: &Any) -> Result<Self, BesuIBCError> {
        ensure!(
            any.type_url == Self::TYPE_URL,
            BesuIBCError::TypeMismatch {
                expected: Self::TYPE_URL.to_string(),
                found: any.type_url.clone(),
            }
        );
        Ok(Self::decode(any.value.as_slice())?)
    }
}

impl TypedMessage for ClientState {
    const TYPE_URL: &'static str = CLIENT_STATE_TYPE_URL;
}

impl TypedMessage for ConsensusState {
    const TYPE_URL: &'static str = CONSENSUS_STATE_TYPE_URL;
}

impl TypedMessage for Header {
    const TYPE_URL: &'static str = HEADER_TYPE_URL;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn any_round_trip_keeps_the_message() {
        let consensus_state = ConsensusState {
            timestamp: 1_700_000_000,
            root: vec![0xab; 32],
            validators: vec![vec![0x01; 20], vec![0x02; 20]],
        };
        let any = consensus_state.to_any();

        assert_eq!(any.type_url, CONSENSUS_STATE_TYPE_URL);
        assert_eq!(ConsensusState::from_any(&any).unwrap(), consensus_state);
    }

    #[test]
    fn rejects_other_type_urls() {
        let any = ClientState::default().to_any();

        assert_eq!(
            ConsensusState::from_any(&any),
            Err(BesuIBCError::TypeMismatch {
                expected: CONSENSUS_STATE_TYPE_URL.to_string(),
                found: CLIENT_STATE_TYPE_URL.to_string(),
            })
        );
    }

    #[test]
    fn rejects_undecodable_values() {
        let any = Any {
            type_url: HEADER_TYPE_URL.to_string(),
            value: vec![0xff, 0xff, 0xff],
        };

        assert!(matches!(
            Header::from_any(&any),
            Err(BesuIBCError::ProtoDecode(_))
        ));
    }
}
