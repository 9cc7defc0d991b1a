//! 演示数据：与 `mapping` 故障表对应的技师名册与备件库存

use crate::domain::{Part, Technician};

pub fn demo_technicians() -> Vec<Technician> {
    vec![
        Technician::new(
            "tech-001",
            "John Smith",
            "Maintenance",
            &[
                "tire_curing_press",
                "temperature_control",
                "instrumentation",
                "electrical_systems",
                "plc_troubleshooting",
                "mold_maintenance",
                "bladder_replacement",
            ],
        ),
        Technician::new(
            "tech-002",
            "Maria Garcia",
            "Maintenance",
            &[
                "tire_building_machine",
                "vibration_analysis",
                "bearing_replacement",
                "alignment",
                "precision_alignment",
                "drum_balancing",
                "mechanical_systems",
            ],
        ),
        Technician::new(
            "tech-003",
            "Wei Chen",
            "Process Engineering",
            &[
                "tire_extruder",
                "temperature_control",
                "rubber_processing",
                "screw_maintenance",
                "motor_drives",
                "banbury_mixer",
            ],
        ),
        Technician::new(
            "tech-004",
            "Aisha Okafor",
            "Quality",
            &[
                "tire_uniformity_machine",
                "data_analysis",
                "measurement_systems",
                "calibration",
                "load_cell_calibration",
                "sensor_alignment",
            ],
        ),
        Technician::new(
            "tech-005",
            "Lars Nilsson",
            "Electrical",
            &[
                "electrical_systems",
                "plc_programming",
                "servo_systems",
                "motor_drives",
                "hydraulic_systems",
                "pneumatic_systems",
            ],
        ),
        Technician::new(
            "tech-006",
            "Priya Nair",
            "Maintenance",
            &["tension_control", "servo_systems", "tire_building_machine"],
        )
        .unavailable(),
    ]
}

pub fn demo_parts() -> Vec<Part> {
    vec![
        Part::new("part-001", "TCP-HTR-4KW", "Curing press heating element 4kW", "heating", 6),
        Part::new("part-002", "GEN-TS-K400", "Type K thermocouple sensor 400C", "sensors", 24),
        Part::new("part-003", "TCP-BLD-800", "Curing bladder 800mm", "consumables", 10),
        Part::new("part-004", "TCP-SEAL-200", "Press hydraulic seal kit", "seals", 15),
        Part::new("part-005", "TBM-BRG-6220", "Drum deep groove bearing 6220", "bearings", 8),
        Part::new("part-006", "TBM-LS-500N", "Ply tension load sensor 500N", "sensors", 4),
        Part::new("part-007", "TBM-SRV-5KW", "Servo motor 5kW", "drives", 2),
        Part::new("part-008", "EXT-HTR-BAND", "Extruder barrel band heater", "heating", 12),
        Part::new("part-009", "EXT-SCR-250", "Extruder screw 250mm", "mechanical", 1),
        Part::new("part-010", "TUM-LC-2KN", "Uniformity machine load cell 2kN", "sensors", 3),
        Part::new("part-011", "TUM-ENC-5000", "Spindle encoder 5000ppr", "sensors", 5),
        Part::new("part-012", "BMX-TIP-500", "Mixer rotor tip 500mm", "mechanical", 2),
        Part::new("part-013", "BMX-SEAL-DP", "Mixer dust stop seal", "seals", 7),
    ]
}
