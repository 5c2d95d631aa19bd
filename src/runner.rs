//! # Scan Runner
//!
//! The orchestrator that threads transport, client, transcript, heuristics,
//! probes and detectors through a single scan and emits the final report.
//! State machine: Init, Handshake, Discovery, Static Scan, Dynamic Scan,
//! Teardown — exactly the phases `spec.md` names, run in that order on a
//! single task with no internal concurrency beyond the stdio transport's
//! background reader.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::{ScanConfig, TransportKind};
use crate::error::ScanResult;
use crate::heuristics::rank_tools;
use crate::mcp_client::{MCPClient, MCPResponse, Prompt, Resource, Tool};
use crate::probes::{dynamic_probes, severity_for_probe, Probe, PromptInjectionProbe};
use crate::report::{Confidence, Finding, Report, ReportSummary};
use crate::signals::{detect_canary, detect_error_leak, detect_ssrf, detect_timing};
use crate::transcript::{Direction, TranscriptWriter};
use crate::transport::http::HttpTransport;
use crate::transport::stdio::StdioTransport;
use crate::transport::Transport;

const REMEDIATION_TEXT: &str = "Harden input validation and restrict dangerous operations.";

/// Runs a complete scan against the target described by `config` and
/// writes `transcript.jsonl`, `report.json` and `report.md` under
/// `config.out_dir`. Fatal configuration problems must be caught before
/// this is called (see [`ScanConfig::from_env`]); once a scan has started,
/// per-call transport faults are recorded and the scan continues.
pub async fn run_scan(config: &ScanConfig) -> ScanResult<Report> {
    std::fs::create_dir_all(&config.out_dir).map_err(crate::error::ScanError::TransportIo)?;

    let transcript_path = config.out_dir.join("transcript.jsonl");
    let mut transcript = TranscriptWriter::create(&transcript_path)?;

    let transport = build_transport(&config.transport)?;
    let mut client = MCPClient::new(transport);

    let target = describe_target(&config.transport);
    let latency_threshold_ms = config.timeout.as_secs_f64() * 1000.0 * 0.8;

    let mut findings: Vec<Finding> = Vec::new();
    let mut tests_run: u32 = 0;
    let mut tools: Vec<Tool> = Vec::new();
    let mut resources: Vec<Resource> = Vec::new();
    let mut prompts: Vec<Prompt> = Vec::new();

    let scan_result = run_scan_inner(
        &mut client,
        &mut transcript,
        config,
        &mut findings,
        &mut tests_run,
        &mut tools,
        &mut resources,
        &mut prompts,
        latency_threshold_ms,
    )
    .await;

    client.close().await;
    transcript.close();

    scan_result?;

    let report = Report {
        summary: ReportSummary {
            target,
            tool_count: tools.len(),
            tests_run,
            include_llm: config.include_llm_probes,
        },
        findings,
    };

    report.write(&config.out_dir.join("report.json"), &config.out_dir.join("report.md"))?;
    info!(tests_run, tool_count = report.summary.tool_count, "scan complete");

    Ok(report)
}

#[allow(clippy::too_many_arguments)]
async fn run_scan_inner(
    client: &mut MCPClient,
    transcript: &mut TranscriptWriter,
    config: &ScanConfig,
    findings: &mut Vec<Finding>,
    tests_run: &mut u32,
    tools: &mut Vec<Tool>,
    resources: &mut Vec<Resource>,
    prompts: &mut Vec<Prompt>,
    latency_threshold_ms: f64,
) -> ScanResult<()> {
    let timeout = config.timeout;

    // --- Handshake ---
    let init_params = json!({"protocolVersion": crate::mcp_client::PROTOCOL_VERSION, "capabilities": {}});
    match client.initialize(timeout).await {
        Ok(response) => record_pair(transcript, "initialize", &init_params, &response)?,
        Err(e) => {
            warn!(error = %e, "initialize failed, continuing scan");
            transcript.record(Direction::Request, "initialize", 0, &init_params, None, None)?;
            transcript.record(
                Direction::Response,
                "initialize",
                0,
                &json!({}),
                None,
                Some(e.to_string()),
            )?;
        }
    }

    // --- Discovery ---
    let mut list_tools_id = 0u64;
    match client.list_tools(timeout).await {
        Ok((response, discovered)) => {
            list_tools_id = response.request_id;
            record_pair(transcript, "listTools", &json!({}), &response)?;
            *tools = discovered;
        }
        Err(e) => warn!(error = %e, "listTools failed, continuing scan"),
    }

    let mut list_resources_id = 0u64;
    match client.list_resources(timeout).await {
        Ok((response, discovered)) => {
            list_resources_id = response.request_id;
            record_pair(transcript, "listResources", &json!({}), &response)?;
            *resources = discovered;
        }
        Err(e) => warn!(error = %e, "listResources failed, continuing scan"),
    }

    let mut list_prompts_id = 0u64;
    match client.list_prompts(timeout).await {
        Ok((response, discovered)) => {
            list_prompts_id = response.request_id;
            record_pair(transcript, "listPrompts", &json!({}), &response)?;
            *prompts = discovered;
        }
        Err(e) => warn!(error = %e, "listPrompts failed, continuing scan"),
    }

    // --- Static Scan ---
    let prompt_probe = PromptInjectionProbe;
    let static_findings = prompt_probe.scan(tools, resources, prompts);
    for finding in static_findings {
        let transcript_id = if finding.location.starts_with("tool:") {
            list_tools_id
        } else if finding.location.starts_with("resource:") {
            list_resources_id
        } else {
            list_prompts_id
        };
        findings.push(Finding {
            severity: severity_for_probe(PromptInjectionProbe::NAME),
            confidence: Confidence::Low,
            tool_name: finding.location.clone(),
            probe_name: PromptInjectionProbe::NAME.to_string(),
            description: "Potential prompt injection pattern detected".to_string(),
            repro_args: json!({}),
            evidence: vec![crate::signals::SignalEvidence {
                signal: crate::signals::SignalKind::PromptInjectionSignal,
                detail: format!("Matched content: {}", finding.content),
                transcript_id,
            }],
            remediation: "Review prompt/tool descriptions to remove instruction-hijacking content.".to_string(),
        });
    }

    // --- Dynamic Scan ---
    let tool_risks = rank_tools(tools);
    let probes = dynamic_probes();

    'tools: for tool_risk in &tool_risks {
        let tool = &tool_risk.tool;
        for probe in &probes {
            let cases = probe.generate(tool, &config.metadata);
            for test_case in cases {
                if *tests_run >= config.budget {
                    break 'tools;
                }
                *tests_run += 1;
                debug!(tool = %test_case.tool_name, probe = test_case.probe_name, tests_run, "dispatching test case");

                let call_params = json!({"name": test_case.tool_name, "arguments": test_case.args});
                match client.call_tool(&test_case.tool_name, &test_case.args, timeout).await {
                    Ok(response) => {
                        transcript.record(
                            Direction::Request,
                            "callTool",
                            response.request_id,
                            &call_params,
                            None,
                            None,
                        )?;
                        let response_payload = json!({"result": response.result, "error": response.error});
                        transcript.record(
                            Direction::Response,
                            "callTool",
                            response.request_id,
                            &response_payload,
                            Some(response.latency_ms),
                            response.error.as_ref().map(|e| e.to_string()),
                        )?;

                        let mut evidence = Vec::new();
                        evidence.extend(detect_error_leak(&response_payload, response.request_id));
                        evidence.extend(detect_canary(&response_payload, response.request_id));
                        evidence.extend(detect_ssrf(&response_payload, response.request_id));
                        evidence.extend(detect_timing(response.latency_ms, latency_threshold_ms, response.request_id));

                        if !evidence.is_empty() {
                            findings.push(Finding {
                                severity: severity_for_probe(test_case.probe_name),
                                confidence: Confidence::High,
                                tool_name: test_case.tool_name.clone(),
                                probe_name: test_case.probe_name.to_string(),
                                description: format!("Probe {} triggered signals", test_case.probe_name),
                                repro_args: test_case.args.clone(),
                                evidence,
                                remediation: REMEDIATION_TEXT.to_string(),
                            });
                        }
                    }
                    Err(e) => {
                        warn!(tool = %test_case.tool_name, error = %e, "callTool failed, continuing scan");
                        transcript.record(
                            Direction::Request,
                            "callTool",
                            0,
                            &call_params,
                            None,
                            None,
                        )?;
                        transcript.record(
                            Direction::Response,
                            "callTool",
                            0,
                            &json!({}),
                            None,
                            Some(e.to_string()),
                        )?;
                    }
                }
            }
            if *tests_run >= config.budget {
                break 'tools;
            }
        }
    }

    Ok(())
}

fn record_pair(
    transcript: &mut TranscriptWriter,
    method: &str,
    request_params: &Value,
    response: &MCPResponse,
) -> ScanResult<()> {
    transcript.record(Direction::Request, method, response.request_id, request_params, None, None)?;
    let response_payload = json!({"result": response.result, "error": response.error});
    transcript.record(
        Direction::Response,
        method,
        response.request_id,
        &response_payload,
        Some(response.latency_ms),
        response.error.as_ref().map(|e| e.to_string()),
    )
}

fn build_transport(kind: &TransportKind) -> ScanResult<Transport> {
    match kind {
        TransportKind::Stdio { command } => Ok(Transport::Stdio(StdioTransport::spawn(command)?)),
        TransportKind::Http { url } => Ok(Transport::Http(HttpTransport::new(url.clone()))),
    }
}

fn describe_target(kind: &TransportKind) -> String {
    match kind {
        TransportKind::Stdio { command } => command.clone(),
        TransportKind::Http { url } => url.clone(),
    }
}
