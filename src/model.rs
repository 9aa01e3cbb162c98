//! Shared data model: agency records, moods and display modes.

use core::fmt;

/// Wait below this is [`Mood::Happy`] (5 minutes).
pub const HAPPY_BELOW_MS: u64 = 300_000;

/// Wait below this (and at least [`HAPPY_BELOW_MS`]) is [`Mood::Neutral`] (10 minutes).
pub const NEUTRAL_BELOW_MS: u64 = 600_000;

/// One service location and its latest known wait time.
///
/// Records are created once from the bulk listing and only ever have
/// `wait_ms` updated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgencyRecord {
    /// Feed identifier, used to build the per-agency URL.
    pub id: String,
    /// Display name, already normalized.
    pub name: String,
    /// Longest current wait in milliseconds.
    pub wait_ms: u64,
}

impl AgencyRecord {
    /// Creates a record, normalizing `name`.
    pub fn new(id: impl Into<String>, name: &str, wait_ms: u64) -> Self {
        Self {
            id: id.into(),
            name: normalize_name(name),
            wait_ms,
        }
    }

    /// Mood derived from the current wait.
    #[inline]
    pub fn mood(&self) -> Mood {
        Mood::from_wait_ms(self.wait_ms)
    }

    /// Wait rounded down to whole minutes.
    #[inline]
    pub fn wait_minutes(&self) -> u64 {
        self.wait_ms / 60_000
    }
}

/// Display category derived from a wait time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mood {
    /// Under 5 minutes.
    Happy,
    /// 5 to 10 minutes.
    Neutral,
    /// 10 minutes or more.
    Sad,
}

impl Mood {
    /// Classifies a wait. Lower bounds are inclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use agency_board::Mood;
    ///
    /// assert_eq!(Mood::from_wait_ms(299_999), Mood::Happy);
    /// assert_eq!(Mood::from_wait_ms(300_000), Mood::Neutral);
    /// assert_eq!(Mood::from_wait_ms(600_000), Mood::Sad);
    /// ```
    pub const fn from_wait_ms(wait_ms: u64) -> Self {
        if wait_ms < HAPPY_BELOW_MS {
            Mood::Happy
        } else if wait_ms < NEUTRAL_BELOW_MS {
            Mood::Neutral
        } else {
            Mood::Sad
        }
    }

    /// Number of alert beeps played when this mood is shown.
    pub const fn beep_count(&self) -> u32 {
        match self {
            Mood::Happy => 0,
            Mood::Neutral => 1,
            Mood::Sad => 3,
        }
    }

    /// Lowercase name for logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level screens, cycled in declaration order by the mode button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Heart animation and brand lettering.
    #[default]
    Welcome,
    /// Wi-Fi and API key status.
    Info,
    /// Meaning of the status indicators.
    Legend,
    /// Agency wait-time carousel.
    Carousel,
    /// Scan-me code.
    QrCode,
}

impl DisplayMode {
    /// Every mode in cycle order.
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::Welcome,
        DisplayMode::Info,
        DisplayMode::Legend,
        DisplayMode::Carousel,
        DisplayMode::QrCode,
    ];

    /// The mode that follows this one, wrapping around.
    ///
    /// # Examples
    ///
    /// ```
    /// use agency_board::DisplayMode;
    ///
    /// assert_eq!(DisplayMode::Legend.next(), DisplayMode::Carousel);
    /// assert_eq!(DisplayMode::QrCode.next(), DisplayMode::Welcome);
    /// ```
    pub const fn next(self) -> Self {
        match self {
            DisplayMode::Welcome => DisplayMode::Info,
            DisplayMode::Info => DisplayMode::Legend,
            DisplayMode::Legend => DisplayMode::Carousel,
            DisplayMode::Carousel => DisplayMode::QrCode,
            DisplayMode::QrCode => DisplayMode::Welcome,
        }
    }
}

/// Strips the accents the feed uses and uppercases.
///
/// The panel font only has unaccented capitals.
///
/// # Examples
///
/// ```
/// use agency_board::model::normalize_name;
///
/// assert_eq!(normalize_name("Nouméa Centre"), "NOUMEA CENTRE");
/// ```
pub fn normalize_name(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' => 'e',
            _ => c,
        })
        .collect::<String>()
        .to_uppercase()
}
