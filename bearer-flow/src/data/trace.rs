use anyhow::{Result, ensure};
use gtpc::{CallFlowMessage, MessageKind, NodeId};
use serde::Deserialize;
use serde_json::Value;
use slog::{Logger, error, info, warn};
use std::fs;

#[derive(Deserialize)]
struct TraceFile {
    #[serde(default)]
    message: Vec<toml::Value>,
}

// Just enough of a record to place it in the call flow when the rest will not decode.
#[derive(Deserialize)]
struct MessageHeader {
    id: u64,
    #[serde(alias = "src_addr")]
    src_node: NodeId,
    #[serde(alias = "dst_addr")]
    dst_node: NodeId,
    #[serde(alias = "message")]
    procedure: String,
}

/// Load a decoded call flow from file into memory.  A `.json` file holds an array of
/// messages as produced by the capture decoder; anything else is read as TOML with one
/// `[[message]]` table per message.
///
/// A record whose bearer contents do not decode is kept as a message that changes
/// nothing, so that the call flow keeps one step per captured message.
pub fn load_trace_file(filename: &str, logger: &Logger) -> Result<Vec<CallFlowMessage>> {
    let path = std::env::current_dir()?;
    let contents = fs::read_to_string(filename).inspect_err(|e| {
        error!(
            logger,
            "Failed to load trace file {filename} (current directory {}) with error code {e}",
            path.display()
        )
    })?;
    let records = if filename.ends_with(".json") {
        serde_json::from_str::<Vec<Value>>(&contents)?
    } else {
        toml::from_str::<TraceFile>(&contents)?
            .message
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?
    };
    let messages = records
        .into_iter()
        .map(|record| decode_record(record, logger))
        .collect::<Result<Vec<_>>>()?;
    ensure!(!messages.is_empty(), "No call flow messages in {filename}");
    info!(logger, "Loaded {} call flow messages from {filename}", messages.len());
    Ok(messages)
}

fn decode_record(record: Value, logger: &Logger) -> Result<CallFlowMessage> {
    match serde_json::from_value::<CallFlowMessage>(record.clone()) {
        Ok(cf) => Ok(cf),
        Err(e) => {
            let header: MessageHeader = serde_json::from_value(record)?;
            warn!(
                logger,
                "Message {} ({}) kept as pass-through - {e}",
                header.id,
                header.procedure
            );
            Ok(CallFlowMessage {
                id: header.id,
                src_node: header.src_node,
                dst_node: header.dst_node,
                procedure: MessageKind::Other(header.procedure),
                bearer_list: vec![],
                ebi: None,
                timestamp: None,
            })
        }
    }
}
