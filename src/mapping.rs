//! 故障 → 技能 / 备件映射
//!
//! 静态查表，纯函数；未知故障类型返回空列表而不是错误。

/// 单个故障类型所需的技能与备件号
struct FaultRequirements {
    fault_type: &'static str,
    skills: &'static [&'static str],
    parts: &'static [&'static str],
}

const FAULT_TABLE: &[FaultRequirements] = &[
    FaultRequirements {
        fault_type: "curing_temperature_excessive",
        skills: &[
            "tire_curing_press",
            "temperature_control",
            "instrumentation",
            "electrical_systems",
            "plc_troubleshooting",
            "mold_maintenance",
        ],
        parts: &["TCP-HTR-4KW", "GEN-TS-K400"],
    },
    FaultRequirements {
        fault_type: "curing_cycle_time_deviation",
        skills: &[
            "tire_curing_press",
            "plc_troubleshooting",
            "hydraulic_systems",
            "pneumatic_systems",
            "bladder_replacement",
        ],
        parts: &["TCP-BLD-800", "TCP-SEAL-200"],
    },
    FaultRequirements {
        fault_type: "building_drum_vibration",
        skills: &[
            "tire_building_machine",
            "vibration_analysis",
            "bearing_replacement",
            "alignment",
            "precision_alignment",
            "drum_balancing",
            "mechanical_systems",
        ],
        parts: &["TBM-BRG-6220", "TBM-LS-500N"],
    },
    FaultRequirements {
        fault_type: "ply_tension_excessive",
        skills: &[
            "tire_building_machine",
            "tension_control",
            "servo_systems",
            "precision_alignment",
            "sensor_alignment",
            "plc_programming",
        ],
        parts: &["TBM-LS-500N", "TBM-SRV-5KW"],
    },
    FaultRequirements {
        fault_type: "extruder_barrel_overheating",
        skills: &[
            "tire_extruder",
            "temperature_control",
            "rubber_processing",
            "screw_maintenance",
            "instrumentation",
            "electrical_systems",
            "motor_drives",
        ],
        parts: &["EXT-HTR-BAND", "GEN-TS-K400"],
    },
    FaultRequirements {
        fault_type: "low_material_throughput",
        skills: &[
            "tire_extruder",
            "screw_maintenance",
            "motor_drives",
            "rubber_processing",
        ],
        parts: &["EXT-SCR-250", "EXT-DIE-TR"],
    },
    FaultRequirements {
        fault_type: "high_radial_force_variation",
        skills: &[
            "tire_uniformity_machine",
            "data_analysis",
            "measurement_systems",
            "calibration",
        ],
        parts: &["TUM-LC-2KN", "TUM-ENC-5000"],
    },
    FaultRequirements {
        fault_type: "load_cell_drift",
        skills: &[
            "tire_uniformity_machine",
            "load_cell_calibration",
            "measurement_systems",
            "sensor_alignment",
            "instrumentation",
        ],
        parts: &["TUM-LC-2KN", "TUM-CAL-SET"],
    },
    FaultRequirements {
        fault_type: "mixing_temperature_excessive",
        skills: &[
            "banbury_mixer",
            "temperature_control",
            "rubber_processing",
            "instrumentation",
            "hydraulic_systems",
        ],
        parts: &["BMX-TIP-500", "GEN-TS-K400"],
    },
    FaultRequirements {
        fault_type: "excessive_power_consumption",
        skills: &[
            "banbury_mixer",
            "motor_drives",
            "electrical_systems",
            "bearing_replacement",
            "vibration_analysis",
        ],
        parts: &["BMX-BRG-22320", "BMX-SEAL-DP"],
    },
];

fn lookup(fault_type: &str) -> Option<&'static FaultRequirements> {
    let key = fault_type.trim();
    FAULT_TABLE.iter().find(|r| r.fault_type == key)
}

/// 修复该故障所需的技能（有序）；未知故障类型返回空
pub fn required_skills(fault_type: &str) -> Vec<String> {
    lookup(fault_type)
        .map(|r| r.skills.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// 修复该故障所需的备件号（有序）；未知故障类型返回空
pub fn required_parts(fault_type: &str) -> Vec<String> {
    lookup(fault_type)
        .map(|r| r.parts.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// 映射表中的全部故障类型
pub fn known_fault_types() -> Vec<&'static str> {
    FAULT_TABLE.iter().map(|r| r.fault_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fault_type_is_empty() {
        for fault in ["", "   ", "unknown_fault", "CURING_TEMPERATURE_EXCESSIVE"] {
            assert!(required_skills(fault).is_empty(), "skills for {fault:?}");
            assert!(required_parts(fault).is_empty(), "parts for {fault:?}");
        }
    }

    #[test]
    fn test_known_fault_type_keeps_table_order() {
        let skills = required_skills("building_drum_vibration");
        assert_eq!(skills.first().map(String::as_str), Some("tire_building_machine"));
        assert_eq!(skills.len(), 7);
        assert_eq!(
            required_parts("building_drum_vibration"),
            vec!["TBM-BRG-6220".to_string(), "TBM-LS-500N".to_string()]
        );
    }

    #[test]
    fn test_every_known_fault_maps_to_skills_and_parts() {
        for fault in known_fault_types() {
            assert!(!required_skills(fault).is_empty(), "{fault}");
            assert!(!required_parts(fault).is_empty(), "{fault}");
        }
    }

    #[test]
    fn test_lookup_trims_whitespace() {
        assert_eq!(
            required_parts("  load_cell_drift\n"),
            required_parts("load_cell_drift")
        );
    }
}
