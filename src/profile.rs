//! Names for well-known messages and fields.
//!
//! Record schemas are carried entirely inside each document, so nothing here
//! affects decoding; this catalog only labels global message numbers and
//! record-relative field numbers for diagnostics and display.

/// Catalog entry for one field of a well-known message kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo {
    pub field_id: u8,
    pub name: &'static str,
    pub is_enum: bool,
    pub is_array: bool,
}

/// Catalog entry for one well-known message kind.
#[derive(Debug, Clone, Copy)]
pub struct MessageInfo {
    pub global_message_number: u16,
    pub name: &'static str,
    pub fields: &'static [FieldInfo],
}

impl MessageInfo {
    /// Find the first entry for a field number, if cataloged.
    ///
    /// Some numbers carry aliases; the primary name comes first.
    pub fn field(&self, field_id: u8) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }
}

const fn field(field_id: u8, name: &'static str) -> FieldInfo {
    FieldInfo {
        field_id,
        name,
        is_enum: false,
        is_array: false,
    }
}

const fn enum_field(field_id: u8, name: &'static str) -> FieldInfo {
    FieldInfo {
        field_id,
        name,
        is_enum: true,
        is_array: false,
    }
}

const fn array_field(field_id: u8, name: &'static str) -> FieldInfo {
    FieldInfo {
        field_id,
        name,
        is_enum: false,
        is_array: true,
    }
}

/// Look up the catalog entry for a global message number.
pub fn message_info(global_message_number: u16) -> Option<&'static MessageInfo> {
    CATALOG
        .iter()
        .find(|m| m.global_message_number == global_message_number)
}

/// Look up the name of a global message number.
pub fn message_name(global_message_number: u16) -> Option<&'static str> {
    if let Some(info) = message_info(global_message_number) {
        return Some(info.name);
    }

    Some(match global_message_number {
        1 => "Capabilities",
        2 => "DeviceSettings",
        3 => "UserProfile",
        4 => "HrmProfile",
        5 => "SdmProfile",
        6 => "BikeProfile",
        7 => "ZonesTarget",
        8 => "HrZone",
        9 => "PowerZone",
        10 => "MetZone",
        12 => "Sport",
        15 => "Goal",
        18 => "Session",
        26 => "Workout",
        27 => "WorkoutStep",
        28 => "Schedule",
        30 => "WeightScale",
        31 => "Course",
        32 => "CoursePoint",
        33 => "Totals",
        34 => "Activity",
        35 => "Software",
        37 => "FileCapabilities",
        38 => "MesgCapabilities",
        39 => "FieldCapabilities",
        49 => "FileCreator",
        51 => "BloodPressure",
        53 => "SpeedZone",
        55 => "Monitoring",
        78 => "Hrv",
        101 => "Length",
        103 => "MonitoringInfo",
        105 => "Pad",
        106 => "SlaveDevice",
        131 => "CadenceZone",
        145 => "MemoGlob",
        0xFF00..=0xFFFE => "ManufacturerSpecific",
        _ => return None,
    })
}

static CATALOG: [MessageInfo; 5] = [
    MessageInfo {
        global_message_number: 0,
        name: "FileId",
        fields: &[
            enum_field(0, "Type"),
            field(1, "Manufacturer"),
            field(2, "Product"),
            field(3, "SerialNumber"),
            field(4, "TimeCreated"),
            field(5, "Number"),
        ],
    },
    MessageInfo {
        global_message_number: 19,
        name: "Lap",
        fields: &[
            enum_field(0, "Event"),
            enum_field(1, "EventType"),
            field(2, "StartTime"),
            field(3, "StartPositionLat"),
            field(4, "StartPositionLong"),
            field(5, "EndPositionLat"),
            field(6, "EndPositionLong"),
            field(7, "TotalElapsedTime"),
            field(8, "TotalTimerTime"),
            field(9, "TotalDistance"),
            field(10, "TotalCycles"),
            field(10, "TotalStrides"), // alias
            field(11, "TotalCalories"),
            field(12, "TotalFatCalories"),
            field(13, "AvgSpeed"),
            field(14, "MaxSpeed"),
            field(15, "AvgHeartRate"),
            field(16, "MaxHeartRate"),
            field(17, "AvgCadence"),
            field(17, "AvgRunningCadence"), // alias
            field(18, "MaxCadence"),
            field(18, "MaxRunningCadence"), // alias
            field(19, "AvgPower"),
            field(20, "MaxPower"),
            field(21, "TotalAscent"),
            field(22, "TotalDescent"),
            field(23, "Intensity"),
            enum_field(24, "LapTrigger"),
            enum_field(25, "Sport"),
            field(26, "EventGroup"),
            field(32, "NumLengths"),
            field(33, "NormalizedPower"),
            field(34, "LeftRightBalance"),
            field(35, "FirstLengthIndex"),
            field(37, "AvgStrokeDistance"),
            enum_field(38, "SwimStroke"),
            enum_field(39, "SubSport"),
            field(40, "NumActiveLengths"),
            field(41, "TotalWork"),
            field(42, "AvgAltitude"),
            field(43, "MaxAltitude"),
            field(44, "GpsAccuracy"),
            field(45, "AvgGrade"),
            field(46, "AvgPosGrade"),
            field(47, "AvgNegGrade"),
            field(48, "MaxPosGrade"),
            field(49, "MaxNegGrade"),
            field(50, "AvgTemperature"),
            field(51, "MaxTemperature"),
            field(52, "TotalMovingTime"),
            field(53, "AvgPosVerticalSpeed"),
            field(54, "AvgNegVerticalSpeed"),
            field(55, "MaxPosVerticalSpeed"),
            field(56, "MaxNegVerticalSpeed"),
            array_field(57, "TimeInHrZone"),
            array_field(58, "TimeInSpeedZone"),
            array_field(59, "TimeInCadenceZone"),
            array_field(60, "TimeInPowerZone"),
            field(61, "RepetitionNum"),
            field(62, "MinAltitude"),
            field(63, "MinHeartRate"),
            field(71, "WktStepIndex"),
            field(74, "OpponentScore"),
            array_field(75, "StrokeCount"),
            array_field(76, "ZoneCount"),
            field(77, "AvgVerticalOscillation"),
            field(78, "AvgStanceTimePercent"),
            field(79, "AvgStanceTime"),
            field(80, "AvgFractionalCadence"),
            field(81, "MaxFractionalCadence"),
            field(82, "TotalFractionalCycles"),
            field(83, "PlayerScore"),
            array_field(84, "AvgTotalHemoglobinConc"),
            array_field(85, "MinTotalHemoglobinConc"),
            array_field(86, "MaxTotalHemoglobinConc"),
            array_field(87, "AvgSaturatedHemoglobinPercent"),
            array_field(88, "MinSaturatedHemoglobinPercent"),
            array_field(89, "MaxSaturatedHemoglobinPercent"),
            field(91, "AvgLeftTorqueEffectiveness"),
            field(92, "AvgRightTorqueEffectiveness"),
            field(93, "AvgLeftPedalSmoothness"),
            field(94, "AvgRightPedalSmoothness"),
            field(95, "AvgCombinedPedalSmoothness"),
            field(253, "TimeStamp"),
            field(254, "MessageIndex"),
        ],
    },
    MessageInfo {
        global_message_number: 20,
        name: "Record",
        fields: &[
            field(0, "PositionLat"),
            field(1, "PositionLong"),
            field(2, "Altitude"),
            field(3, "HeartRate"),
            field(4, "Cadence"),
            field(5, "Distance"),
            field(6, "Speed"),
            field(7, "Power"),
            array_field(8, "CompressedSpeedDistance"),
            field(9, "Grade"),
            field(10, "Resistance"),
            field(11, "TimeFromCourse"),
            field(12, "CycleLength"),
            field(13, "Temperature"),
            array_field(17, "Speed1s"),
            field(18, "Cycles"),
            field(19, "TotalCycles"),
            field(28, "CompressedAccumulatedPower"),
            field(29, "AccumulatedPower"),
            field(30, "LeftRightBalance"),
            field(31, "GpsAccuracy"),
            field(32, "VerticalSpeed"),
            field(33, "Calories"),
            field(39, "VerticalOscillation"),
            field(40, "StanceTimePercent"),
            field(41, "StanceTime"),
            enum_field(42, "ActivityType"),
            field(43, "LeftTorqueEffectiveness"),
            field(44, "RightTorqueEffectiveness"),
            field(45, "LeftPedalSmoothness"),
            field(46, "RightPedalSmoothness"),
            field(47, "CombinedPedalSmoothness"),
            field(48, "Time128"),
            enum_field(49, "StrokeType"),
            field(50, "Zone"),
            field(51, "BallSpeed"),
            field(52, "Cadence256"),
            field(54, "TotalHemoglobinConc"),
            field(55, "TotalHemoglobinConcMin"),
            field(56, "TotalHemoglobinConcMax"),
            field(57, "SaturatedHemoglobinPercent"),
            field(58, "SaturatedHemoglobinPercentMin"),
            field(59, "SaturatedHemoglobinPercentMax"),
            field(62, "DeviceIndex"),
            field(253, "TimeStamp"),
        ],
    },
    MessageInfo {
        global_message_number: 21,
        name: "Event",
        fields: &[
            enum_field(0, "Event"),
            enum_field(1, "EventType"),
            field(2, "Data16"),
            field(3, "Data32"),
        ],
    },
    MessageInfo {
        global_message_number: 23,
        name: "DeviceInfo",
        fields: &[
            field(0, "DeviceIndex"),
            field(1, "DeviceType"),
            field(1, "AntplusDeviceType"), // alias
            field(1, "AntDeviceType"),     // alias
            field(2, "Manufacturer"),
            field(3, "SerialNumber"),
            field(4, "Product"),
            field(5, "SoftwareVersion"),
            field(6, "HardwareVersion"),
            field(7, "CumOperatingTime"),
            field(10, "BatteryVoltage"),
            field(11, "BatteryStatus"),
            enum_field(18, "SensorPosition"),
            array_field(19, "Descriptor"),
            field(20, "AntTransmissionType"),
            field(21, "AntDeviceNumber"),
            enum_field(22, "AntNetwork"),
            enum_field(25, "SourceType"),
            field(253, "TimeStamp"),
        ],
    },
];
