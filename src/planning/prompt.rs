//! 规划 prompt：固定指令块 + 故障与库存上下文
//!
//! 指令块作为 Agent 定义的 system 指令；`build_planning_prompt` 生成每次请求的 user prompt。

use std::fmt::Write as _;

use crate::planning::PlanningRequest;

/// 规划 Agent 的固定指令：输出字段与业务规则
pub const PLANNER_INSTRUCTIONS: &str = r#"You are a Repair Planner Agent for tire manufacturing equipment.
Generate a repair plan with tasks, timeline, and resource allocation.
Return the response as a single valid JSON object matching the WorkOrder schema, with no markdown and no extra text.

Output JSON with these fields:
- workOrderNumber, machineId, title, description
- type: "corrective" | "preventive" | "emergency"
- priority: "critical" | "high" | "medium" | "low"
- status, assignedTo (technician id or null), notes
- estimatedDuration: integer (minutes, e.g. 60 not "60 minutes")
- partsUsed: [{ partId, partNumber, quantity }]
- tasks: [{ sequence, title, description, estimatedDurationMinutes (integer), requiredSkills, safetyNotes }]

IMPORTANT: All duration fields must be integers representing minutes (e.g. 90), not strings.

Rules:
- Assign the most qualified available technician from the list provided.
- Include only parts listed as available in inventory; use an empty array if none are needed.
- Tasks must be ordered by sequence and be actionable."#;

/// 组装 user prompt：故障、所需技能与备件、候选技师摘要、备件摘要
pub fn build_planning_prompt(request: &PlanningRequest) -> String {
    let fault = &request.fault;
    let mut prompt = String::new();

    prompt.push_str("Create a repair plan for the diagnosed fault below. ");
    prompt.push_str("Respond with one JSON object only; durations are integer minutes.\n\n");

    prompt.push_str("## Diagnosed Fault\n");
    let _ = writeln!(prompt, "- Fault type: {}", fault.fault_type);
    let _ = writeln!(prompt, "- Machine: {}", fault.machine_id);
    let _ = writeln!(prompt, "- Description: {}", fault.description);
    let _ = writeln!(prompt, "- Detected at: {}", fault.detected_at.to_rfc3339());

    prompt.push_str("\n## Required Skills\n");
    push_list(&mut prompt, &request.required_skills);

    prompt.push_str("\n## Required Parts\n");
    push_list(&mut prompt, &request.required_parts);

    prompt.push_str("\n## Available Technicians\n");
    if request.technicians.is_empty() {
        prompt.push_str("(none available; set assignedTo to null)\n");
    }
    for tech in &request.technicians {
        let _ = writeln!(
            prompt,
            "- id: {}, name: {}, skills: [{}]",
            tech.id,
            tech.name,
            tech.skills.join(", ")
        );
    }

    prompt.push_str("\n## Available Parts\n");
    if request.parts.is_empty() {
        prompt.push_str("(none in stock; use an empty partsUsed array)\n");
    }
    for part in &request.parts {
        let _ = writeln!(
            prompt,
            "- partNumber: {}, description: {}, quantity: {}",
            part.part_number, part.description, part.quantity_available
        );
    }

    prompt
}

fn push_list(prompt: &mut String, items: &[String]) {
    if items.is_empty() {
        prompt.push_str("(none)\n");
        return;
    }
    for item in items {
        let _ = writeln!(prompt, "- {}", item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiagnosedFault, Part, Technician};

    fn request() -> PlanningRequest {
        PlanningRequest {
            fault: DiagnosedFault::new(
                "building_drum_vibration",
                "machine-002",
                "Drum vibration above 12 mm/s",
            ),
            required_skills: vec!["vibration_analysis".into(), "bearing_replacement".into()],
            required_parts: vec!["TBM-BRG-6220".into(), "TBM-XX-404".into()],
            technicians: vec![Technician::new(
                "tech-002",
                "Maria Garcia",
                "Maintenance",
                &["vibration_analysis", "bearing_replacement"],
            )],
            parts: vec![Part::new("part-005", "TBM-BRG-6220", "Drum bearing", "bearings", 8)],
        }
    }

    #[test]
    fn test_prompt_is_grounded_in_context() {
        let prompt = build_planning_prompt(&request());
        assert!(prompt.contains("building_drum_vibration"));
        assert!(prompt.contains("machine-002"));
        assert!(prompt.contains("Drum vibration above 12 mm/s"));
        assert!(prompt.contains("- vibration_analysis"));
        assert!(prompt.contains("- TBM-XX-404"));
        assert!(prompt.contains(
            "- id: tech-002, name: Maria Garcia, skills: [vibration_analysis, bearing_replacement]"
        ));
        assert!(prompt.contains("- partNumber: TBM-BRG-6220, description: Drum bearing, quantity: 8"));
    }

    #[test]
    fn test_prompt_marks_empty_sections() {
        let mut req = request();
        req.technicians.clear();
        req.parts.clear();
        req.required_skills.clear();
        let prompt = build_planning_prompt(&req);
        assert!(prompt.contains("(none available; set assignedTo to null)"));
        assert!(prompt.contains("(none in stock; use an empty partsUsed array)"));
        assert!(prompt.contains("## Required Skills\n(none)"));
    }

    #[test]
    fn test_instructions_name_every_output_field() {
        for field in [
            "workOrderNumber",
            "machineId",
            "assignedTo",
            "estimatedDuration",
            "partsUsed",
            "partId",
            "partNumber",
            "quantity",
            "sequence",
            "estimatedDurationMinutes",
            "requiredSkills",
            "safetyNotes",
            "corrective",
            "emergency",
            "critical",
            "low",
        ] {
            assert!(PLANNER_INSTRUCTIONS.contains(field), "missing {field}");
        }
    }
}
