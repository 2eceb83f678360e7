//! Enumerations of the MTConnect information model.
//!
//! Values are wire-stable: members may be added but never renumbered.

use super::enumeration::ua_enumerations;

ua_enumerations! {
	/// State of an actuator.
	ActuatorStateType => ActuatorStateTypeCollection {
		Active = 0 => "ACTIVE",
		Inactive = 1 => "INACTIVE",
	}

	/// State of an alarm.
	AlarmStateType => AlarmStateTypeCollection {
		Active = 1 => "ACTIVE",
		Cleared = 2 => "CLEARED",
	}

	/// Whether a component is able to communicate its data.
	AvailabilityType => AvailabilityTypeCollection {
		Available = 0 => "AVAILABLE",
		Unavailable = 1 => "UNAVAILABLE",
	}

	/// How an axis is coupled to another axis.
	AxisCouplingType => AxisCouplingTypeCollection {
		Tandem = 0 => "TANDEM",
		Synchronous = 1 => "SYNCHRONOUS",
		Master = 2 => "MASTER",
		Slave = 3 => "SLAVE",
	}

	/// Axis interlock state.
	AxisInterlockType => AxisInterlockTypeCollection {
		Active = 0 => "ACTIVE",
		Inactive = 1 => "INACTIVE",
	}

	/// Operating state of an axis.
	AxisStateType => AxisStateTypeCollection {
		Home = 0 => "HOME",
		Travel = 1 => "TRAVEL",
		Parked = 2 => "PARKED",
		Stopped = 3 => "STOPPED",
	}

	/// Category of a data item.
	CategoryType => CategoryTypeCollection {
		Condition = 0 => "CONDITION",
		Event = 1 => "EVENT",
		Sample = 2 => "SAMPLE",
	}

	/// Operating state of a chuck.
	ChuckStateType => ChuckStateTypeCollection {
		Open = 0 => "OPEN",
		Closed = 1 => "CLOSED",
		Unlatched = 2 => "UNLATCHED",
	}

	/// Whether a chuck is interlocked.
	ChuckInterlockType => ChuckInterlockTypeCollection {
		Active = 0 => "ACTIVE",
		Inactive = 1 => "INACTIVE",
	}

	/// Operating mode of a controller.
	ControllerModeType => ControllerModeTypeCollection {
		Automatic = 0 => "AUTOMATIC",
		Manual = 1 => "MANUAL",
		ManualDataInput = 2 => "MANUAL_DATA_INPUT",
		SemiAutomatic = 3 => "SEMI_AUTOMATIC",
		Edit = 4 => "EDIT",
	}

	/// Coordinate system a position is reported in.
	CoordinateSystemType => CoordinateSystemTypeCollection {
		Machine = 0 => "MACHINE",
		Work = 1 => "WORK",
	}

	/// Criticality of a relationship or a process.
	CriticalityType => CriticalityTypeCollection {
		Critical = 0 => "CRITICAL",
		NonCritical = 1 => "NONCRITICAL",
	}

	/// Rotational direction.
	DirectionType => DirectionTypeCollection {
		Clockwise = 0 => "CLOCKWISE",
		CounterClockwise = 1 => "COUNTER_CLOCKWISE",
	}

	/// State of a door.
	DoorStateType => DoorStateTypeCollection {
		Open = 0 => "OPEN",
		Unlatched = 1 => "UNLATCHED",
		Closed = 2 => "CLOSED",
	}

	/// State of an emergency stop.
	EmergencyStopType => EmergencyStopTypeCollection {
		Armed = 0 => "ARMED",
		Triggered = 1 => "TRIGGERED",
	}

	/// Whether the end of a bar stock has been reached.
	EndOfBarType => EndOfBarTypeCollection {
		Yes = 0 => "YES",
		No = 1 => "NO",
	}

	/// Execution state of a component.
	ExecutionType => ExecutionTypeCollection {
		Ready = 0 => "READY",
		Active = 1 => "ACTIVE",
		Interrupted = 2 => "INTERRUPTED",
		Wait = 3 => "WAIT",
		FeedHold = 4 => "FEED_HOLD",
		Stopped = 5 => "STOPPED",
		OptionalStop = 6 => "OPTIONAL_STOP",
		ProgramStopped = 7 => "PROGRAM_STOPPED",
		ProgramCompleted = 8 => "PROGRAM_COMPLETED",
	}

	/// Functional mode of a piece of equipment.
	FunctionalModeType => FunctionalModeTypeCollection {
		Production = 0 => "PRODUCTION",
		Setup = 1 => "SETUP",
		Teardown = 2 => "TEARDOWN",
		Maintenance = 3 => "MAINTENANCE",
		ProcessDevelopment = 4 => "PROCESS_DEVELOPMENT",
	}

	/// Whether an interface is operational.
	InterfaceStateType => InterfaceStateTypeCollection {
		Enabled = 0 => "ENABLED",
		Disabled = 1 => "DISABLED",
	}

	/// Linear direction.
	LinearDirectionType => LinearDirectionTypeCollection {
		Positive = 0 => "POSITIVE",
		Negative = 1 => "NEGATIVE",
	}

	/// How a path is operating relative to other paths.
	PathModeType => PathModeTypeCollection {
		Independent = 0 => "INDEPENDENT",
		Master = 1 => "MASTER",
		Synchronous = 2 => "SYNCHRONOUS",
		Mirror = 3 => "MIRROR",
	}

	/// Power state.
	PowerStateType => PowerStateTypeCollection {
		On = 0 => "ON",
		Off = 1 => "OFF",
	}

	/// Whether a controller is in program edit mode.
	ProgramEditType => ProgramEditTypeCollection {
		Active = 0 => "ACTIVE",
		Ready = 1 => "READY",
		NotReady = 2 => "NOT_READY",
	}

	/// Qualifies a condition.
	QualifierType => QualifierTypeCollection {
		High = 0 => "HIGH",
		Low = 1 => "LOW",
	}

	/// How the values of a data item are represented.
	RepresentationType => RepresentationTypeCollection {
		Value = 0 => "VALUE",
		TimeSeries = 1 => "TIME_SERIES",
		Discrete = 2 => "DISCRETE",
		DataSet = 3 => "DATA_SET",
		Table = 4 => "TABLE",
	}

	/// State of an interface request.
	RequestStateType => RequestStateTypeCollection {
		NotReady = 0 => "NOT_READY",
		Ready = 1 => "READY",
		Active = 2 => "ACTIVE",
		Fail = 3 => "FAIL",
	}

	/// State of an interface response.
	ResponseStateType => ResponseStateTypeCollection {
		NotReady = 0 => "NOT_READY",
		Ready = 1 => "READY",
		Active = 2 => "ACTIVE",
		Fail = 3 => "FAIL",
		Complete = 4 => "COMPLETE",
	}

	/// Operating mode of a rotary axis.
	RotaryModeType => RotaryModeTypeCollection {
		Spindle = 0 => "SPINDLE",
		Index = 1 => "INDEX",
		Contour = 2 => "CONTOUR",
	}

	/// Severity of a condition.
	SeverityType => SeverityTypeCollection {
		Normal = 0 => "NORMAL",
		Warning = 1 => "WARNING",
		Fault = 2 => "FAULT",
		Unavailable = 3 => "UNAVAILABLE",
	}

	/// Status of a cutting tool.
	ToolStateType => ToolStateTypeCollection {
		New = 0 => "NEW",
		Available = 1 => "AVAILABLE",
		Unavailable = 2 => "UNAVAILABLE",
		Allocated = 3 => "ALLOCATED",
		Unallocated = 4 => "UNALLOCATED",
		Measured = 5 => "MEASURED",
		Reconditioned = 6 => "RECONDITIONED",
		Used = 7 => "USED",
		Expired = 8 => "EXPIRED",
		TaggedOut = 9 => "TAGGED_OUT",
		Broken = 10 => "BROKEN",
		Unknown = 11 => "UNKNOWN",
	}

	/// Kind of information a data item reports. `Other` carries an extension
	/// name in [`MtDataItemType`](crate::types::MtDataItemType).
	DataItemTypeEnum => DataItemTypeEnumCollection [catch_all = Other] {
		Acceleration = 0 => "ACCELERATION",
		Amperage = 1 => "AMPERAGE",
		Angle = 2 => "ANGLE",
		AngularVelocity = 3 => "ANGULAR_VELOCITY",
		Availability = 4 => "AVAILABILITY",
		AxisFeedrate = 5 => "AXIS_FEEDRATE",
		Block = 6 => "BLOCK",
		ControllerMode = 7 => "CONTROLLER_MODE",
		Displacement = 8 => "DISPLACEMENT",
		EmergencyStop = 9 => "EMERGENCY_STOP",
		Execution = 10 => "EXECUTION",
		Load = 11 => "LOAD",
		PathFeedrate = 12 => "PATH_FEEDRATE",
		Position = 13 => "POSITION",
		Pressure = 14 => "PRESSURE",
		Program = 15 => "PROGRAM",
		RotaryVelocity = 16 => "ROTARY_VELOCITY",
		Temperature = 17 => "TEMPERATURE",
		Velocity = 18 => "VELOCITY",
		Voltage = 19 => "VOLTAGE",
		Other = 20 => "OTHER",
	}

	/// Statistical operation applied to a sample. `Other` carries an
	/// extension name in [`MtStatistic`](crate::types::MtStatistic).
	StatisticTypeEnum => StatisticTypeEnumCollection [catch_all = Other] {
		Average = 0 => "AVERAGE",
		Kurtosis = 1 => "KURTOSIS",
		Maximum = 2 => "MAXIMUM",
		Median = 3 => "MEDIAN",
		Minimum = 4 => "MINIMUM",
		Mode = 5 => "MODE",
		Range = 6 => "RANGE",
		RootMeanSquare = 7 => "ROOT_MEAN_SQUARE",
		StandardDeviation = 8 => "STANDARD_DEVIATION",
		Other = 9 => "OTHER",
	}
}
