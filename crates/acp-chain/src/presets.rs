//! The demo workflows: hospital, doctor finder and insurance agents chained together.
use indoc::indoc;

use crate::config::Settings;
use crate::errors::ClientResult;
use crate::workflow::{ReportTemplate, SequentialWorkflow, Step};

pub const HEALTH_AGENT: &str = "health_agent";
pub const POLICY_AGENT: &str = "policy_agent";
pub const DOCTOR_AGENT: &str = "doctor_agent";
pub const DOCTOR_FINDER_AGENT: &str = "doctor_finder_agent";

pub const REHABILITATION_QUESTION: &str =
    "Do I need rehabilitation after a shoulder reconstruction?";
pub const WAITING_PERIOD_QUESTION: &str = "What is the waiting period for rehabilitation?";

const DETAILED_REHABILITATION_QUESTION: &str = "Do I need rehabilitation after a shoulder \
    reconstruction? What does the rehabilitation process involve and how long does it \
    typically take?";

const COVERAGE_QUESTION: &str = indoc! {"
    Based on the above medical information about shoulder reconstruction rehabilitation,
    what is the waiting period for my insurance coverage? What are the coverage details?"};

const CONSULTATION_SUMMARY: &str = indoc! {"
    This consultation provides both medical guidance on shoulder reconstruction rehabilitation
    and your specific insurance coverage details, giving you a complete picture for planning
    your recovery process."};

const CARDIOLOGIST_QUESTION: &str =
    "I'm based in Atlanta, GA. Are there any Cardiologists near me?";

const DIABETES_QUESTION: &str =
    "What are the symptoms of diabetes and what treatments are available?";

/// Ask the LangGraph health agent, then the insurer with the health answer as context
pub fn health_insurance(settings: &Settings) -> ClientResult<SequentialWorkflow> {
    let hospital = settings.client(&settings.endpoints.langgraph_hospital)?;
    let insurer = settings.client(&settings.endpoints.insurer)?;

    Ok(SequentialWorkflow::new("health-insurance")
        .with_step(Step::ask(
            "Health Information",
            hospital,
            HEALTH_AGENT,
            REHABILITATION_QUESTION,
        ))
        .with_step(Step::chained(
            "Insurance Information",
            insurer,
            POLICY_AGENT,
            WAITING_PERIOD_QUESTION,
        ))
        .with_report(ReportTemplate::combined("Based on the consultation:")))
}

/// Discover the insurer and hospital agents, then run the detailed two-step consultation
pub fn consultation(settings: &Settings) -> ClientResult<SequentialWorkflow> {
    let insurer = settings.client(&settings.endpoints.insurer)?;
    let hospital = settings.client(&settings.endpoints.hospital)?;

    Ok(SequentialWorkflow::new("consultation")
        .with_discovery(vec![insurer.clone(), hospital.clone()])
        .with_step(Step::ask(
            "Medical Information",
            hospital,
            HEALTH_AGENT,
            DETAILED_REHABILITATION_QUESTION,
        ))
        .with_step(Step::chained(
            "Insurance Coverage Information",
            insurer,
            POLICY_AGENT,
            COVERAGE_QUESTION,
        ))
        .with_report(ReportTemplate::sectioned(
            "Comprehensive Shoulder Surgery Consultation",
            CONSULTATION_SUMMARY,
        )))
}

/// A single question to the hospital's doctor agent
pub fn doctor_finder(settings: &Settings) -> ClientResult<SequentialWorkflow> {
    let hospital = settings.client(&settings.endpoints.hospital)?;

    Ok(SequentialWorkflow::new("doctor-finder").with_step(Step::ask(
        "Doctor Finder",
        hospital,
        DOCTOR_AGENT,
        CARDIOLOGIST_QUESTION,
    )))
}

/// Independent smoke checks of both agents on the LangGraph hospital server
pub fn langgraph_check(settings: &Settings) -> ClientResult<Vec<SequentialWorkflow>> {
    let hospital = settings.client(&settings.endpoints.langgraph_hospital)?;

    Ok(vec![
        SequentialWorkflow::new("langgraph-health").with_step(Step::ask(
            "Health Agent",
            hospital.clone(),
            HEALTH_AGENT,
            DIABETES_QUESTION,
        )),
        SequentialWorkflow::new("langgraph-doctor-finder").with_step(Step::ask(
            "Doctor Finder Agent",
            hospital,
            DOCTOR_FINDER_AGENT,
            "I'm based in Atlanta, GA. Are there any cardiologists near me?",
        )),
    ])
}
