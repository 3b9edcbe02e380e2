use std::fmt;

use crate::{
    curve::{PathControlPoint, PathType},
    model::{
        control_point::{DifficultyPoint, EffectPoint, TimingPoint},
        hit_object::{HitObject, HitObjectKind, HitSoundType, HoldNote, Slider, Spinner},
        mode::GameMode,
        pos::Pos,
    },
    util::{float_ext::FloatExt, log_debug, log_warn},
};

use super::{Beatmap, BreakPeriod};

const OSU_FILE_HEADER: &str = "osu file format v";

/// The most recent `.osu` format version.
pub const LATEST_FORMAT_VERSION: i32 = 14;
const EARLIEST_FORMAT_VERSION: i32 = 3;

const MAX_PARSE_VALUE: f64 = i32::MAX as f64;
const MAX_COORDINATE_VALUE: f64 = 131_072.0;
const MAX_REPEATS: i32 = 9000;

/// Versions below this had their objects placed 24ms too early.
const EARLY_VERSION_TIMING_OFFSET: f64 = 24.0;

const CIRCLE_FLAG: i32 = 1 << 0;
const SLIDER_FLAG: i32 = 1 << 1;
const SPINNER_FLAG: i32 = 1 << 3;
const HOLD_FLAG: i32 = 1 << 7;

/// A `.osu` file could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line} in {section}: {kind}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub section: Section,
    pub kind: ParseErrorKind,
}

/// The reason why parsing failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected `osu file format v` at file begin")]
    IncorrectFileHeader,
    #[error("unsupported file format version {0}")]
    UnsupportedVersion(i32),
    #[error("invalid number for `{field}`")]
    InvalidNumber { field: &'static str },
    #[error("invalid game mode `{0}`")]
    InvalidMode(String),
    #[error("unknown hit object type {0}")]
    UnknownHitObjectType(i32),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("repeat count {0} exceeds the limit of {MAX_REPEATS}")]
    TooManyRepeats(i32),
    #[error("invalid slider control point `{0}`")]
    InvalidControlPoint(String),
    #[error("invalid slider path type `{0}`")]
    InvalidPathType(String),
}

/// Sections of a `.osu` file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Section {
    /// Before the first section header.
    #[default]
    None,
    General,
    Difficulty,
    Events,
    TimingPoints,
    HitObjects,
    /// Any section that is irrelevant for calculations.
    Other,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header {
            "General" => Self::General,
            "Difficulty" => Self::Difficulty,
            "Events" => Self::Events,
            "TimingPoints" => Self::TimingPoints,
            "HitObjects" => Self::HitObjects,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "file header",
            Self::General => "[General]",
            Self::Difficulty => "[Difficulty]",
            Self::Events => "[Events]",
            Self::TimingPoints => "[TimingPoints]",
            Self::HitObjects => "[HitObjects]",
            Self::Other => "unknown section",
        };

        f.write_str(name)
    }
}

/// Parse the content of a `.osu` file.
pub(super) fn decode(content: &str) -> Result<Beatmap, ParseError> {
    let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line));

    let version = parse_header(&mut lines)?;
    let mut state = DecodeState::new(version);
    let mut section = Section::None;

    for (line_no, line) in lines {
        let line = line.trim_end();

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = Section::from_header(header);

            if section == Section::Other {
                log_debug!("skipping section [{header}]");
            }

            continue;
        }

        let line = strip_comment(line);

        let res = match section {
            Section::General => state.parse_general(line),
            Section::Difficulty => state.parse_difficulty(line),
            Section::Events => state.parse_event(line),
            Section::TimingPoints => state.parse_timing_point(line),
            Section::HitObjects => state.parse_hit_object(line),
            Section::None | Section::Other => Ok(()),
        };

        res.map_err(|kind| ParseError {
            line: line_no,
            section,
            kind,
        })?;
    }

    Ok(state.finish())
}

fn parse_header<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<i32, ParseError> {
    let error = |line, kind| ParseError {
        line,
        section: Section::None,
        kind,
    };

    let Some((line_no, line)) = lines.find(|(_, line)| !line.trim().is_empty()) else {
        return Err(error(1, ParseErrorKind::IncorrectFileHeader));
    };

    let line = line.trim_start_matches('\u{feff}').trim();

    let version = line
        .strip_prefix(OSU_FILE_HEADER)
        .ok_or_else(|| error(line_no, ParseErrorKind::IncorrectFileHeader))?
        .parse::<i32>()
        .map_err(|_| {
            error(
                line_no,
                ParseErrorKind::InvalidNumber { field: "version" },
            )
        })?;

    if !(EARLIEST_FORMAT_VERSION..=LATEST_FORMAT_VERSION).contains(&version) {
        return Err(error(line_no, ParseErrorKind::UnsupportedVersion(version)));
    }

    Ok(version)
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) if idx > 0 => line[..idx].trim_end(),
        _ => line,
    }
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;

    Some((key.trim(), value.trim()))
}

fn parse_f64(s: &str, field: &'static str, limit: f64) -> Result<f64, ParseErrorKind> {
    match s.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n.abs() <= limit => Ok(n),
        _ => Err(ParseErrorKind::InvalidNumber { field }),
    }
}

fn parse_f32(s: &str, field: &'static str) -> Result<f32, ParseErrorKind> {
    parse_f64(s, field, MAX_PARSE_VALUE).map(|n| n as f32)
}

fn parse_i32(s: &str, field: &'static str) -> Result<i32, ParseErrorKind> {
    let s = s.trim();

    s.parse::<i32>()
        .or_else(|_| parse_f64(s, field, MAX_PARSE_VALUE).map(|n| n as i32))
        .map_err(|_| ParseErrorKind::InvalidNumber { field })
}

fn clamp_attribute(value: f32, min: f32, max: f32, name: &str) -> f32 {
    let clamped = value.clamp(min, max);

    if clamped.not_eq(value) {
        log_warn!("clamped {name} from {value} to {clamped}");
    }

    clamped
}

struct DecodeState {
    version: i32,
    offset: f64,
    mode: GameMode,
    stack_leniency: f32,
    hp: f32,
    cs: f32,
    od: f32,
    ar: Option<f32>,
    slider_multiplier: f64,
    slider_tick_rate: f64,
    breaks: Vec<BreakPeriod>,
    timing_points: Vec<TimingPoint>,
    difficulty_points: Vec<DifficultyPoint>,
    effect_points: Vec<EffectPoint>,
    last_difficulty_inherited: bool,
    hit_objects: Vec<(HitObject, HitSoundType)>,
}

impl DecodeState {
    fn new(version: i32) -> Self {
        let offset = if version < 5 {
            EARLY_VERSION_TIMING_OFFSET
        } else {
            0.0
        };

        let default = Beatmap::default();

        Self {
            version,
            offset,
            mode: GameMode::Osu,
            stack_leniency: default.stack_leniency,
            hp: default.hp,
            cs: default.cs,
            od: default.od,
            ar: None,
            slider_multiplier: default.slider_multiplier,
            slider_tick_rate: default.slider_tick_rate,
            breaks: Vec::new(),
            timing_points: Vec::with_capacity(1),
            difficulty_points: Vec::new(),
            effect_points: Vec::new(),
            last_difficulty_inherited: false,
            hit_objects: Vec::with_capacity(512),
        }
    }

    fn parse_general(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let Some((key, value)) = split_key_value(line) else {
            return Ok(());
        };

        match key {
            "Mode" => {
                self.mode = value
                    .parse::<u8>()
                    .ok()
                    .and_then(GameMode::from_u8)
                    .ok_or_else(|| ParseErrorKind::InvalidMode(value.to_owned()))?;
            }
            "StackLeniency" => self.stack_leniency = parse_f32(value, "StackLeniency")?,
            _ => {}
        }

        Ok(())
    }

    fn parse_difficulty(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let Some((key, value)) = split_key_value(line) else {
            return Ok(());
        };

        match key {
            "HPDrainRate" => self.hp = parse_f32(value, "HPDrainRate")?,
            "CircleSize" => self.cs = parse_f32(value, "CircleSize")?,
            "OverallDifficulty" => self.od = parse_f32(value, "OverallDifficulty")?,
            "ApproachRate" => self.ar = Some(parse_f32(value, "ApproachRate")?),
            "SliderMultiplier" => {
                self.slider_multiplier = parse_f64(value, "SliderMultiplier", MAX_PARSE_VALUE)?;
            }
            "SliderTickRate" => {
                self.slider_tick_rate = parse_f64(value, "SliderTickRate", MAX_PARSE_VALUE)?;
            }
            _ => {}
        }

        Ok(())
    }

    fn parse_event(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let mut split = line.split(',');

        let Some(kind) = split.next().map(str::trim) else {
            return Ok(());
        };

        if kind != "2" && kind != "Break" {
            return Ok(());
        }

        let start_time = split
            .next()
            .ok_or(ParseErrorKind::MissingField("break start"))
            .and_then(|s| parse_f64(s, "break start", MAX_PARSE_VALUE))?
            + self.offset;

        let end_time = split
            .next()
            .ok_or(ParseErrorKind::MissingField("break end"))
            .and_then(|s| parse_f64(s, "break end", MAX_PARSE_VALUE))?
            + self.offset;

        self.breaks.push(BreakPeriod {
            start_time,
            end_time: end_time.max(start_time),
        });

        Ok(())
    }

    fn parse_timing_point(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let mut split = line.split(',');

        let time = split
            .next()
            .ok_or(ParseErrorKind::MissingField("time"))
            .and_then(|s| parse_f64(s, "time", MAX_PARSE_VALUE))?
            + self.offset;

        let beat_len = split
            .next()
            .ok_or(ParseErrorKind::MissingField("beat length"))
            .and_then(|s| match s.trim().parse::<f64>() {
                Ok(n) if n.is_nan() || n.abs() <= MAX_PARSE_VALUE => Ok(n),
                _ => Err(ParseErrorKind::InvalidNumber {
                    field: "beat length",
                }),
            })?;

        let time_signature = match split.next() {
            Some(s) => match parse_i32(s, "meter")? {
                meter if meter < 1 => TimingPoint::DEFAULT_TIME_SIGNATURE,
                meter => meter as u32,
            },
            None => TimingPoint::DEFAULT_TIME_SIGNATURE,
        };

        // sample set, sample index, volume
        let mut split = split.skip(3);

        let uninherited = match split.next() {
            Some(s) => s.trim().starts_with('1'),
            None => true,
        };

        let effects = match split.next() {
            Some(s) => parse_i32(s, "effects")?,
            None => 0,
        };

        if uninherited {
            let beat_len = if beat_len.is_nan() {
                log_warn!("timing point at {time} has no beat length");

                TimingPoint::DEFAULT_BEAT_LEN
            } else {
                beat_len
            };

            self.timing_points
                .push(TimingPoint::new(time, beat_len, time_signature));

            self.add_difficulty_point(DifficultyPoint::new(time, -100.0), false);
        } else {
            self.add_difficulty_point(DifficultyPoint::new(time, beat_len), true);
        }

        let kiai = effects & 1 == 1;

        match self.effect_points.last_mut() {
            Some(last) if last.time.eq(time) => last.kiai = kiai,
            Some(last) if last.kiai == kiai => {}
            None if !kiai => {}
            _ => self.effect_points.push(EffectPoint { time, kiai }),
        }

        Ok(())
    }

    /// Points at the same time are merged; inherited lines take precedence.
    fn add_difficulty_point(&mut self, point: DifficultyPoint, inherited: bool) {
        match self.difficulty_points.last_mut() {
            Some(last) if last.time.eq(point.time) => {
                if inherited || !self.last_difficulty_inherited {
                    *last = point;
                    self.last_difficulty_inherited = inherited;
                }
            }
            Some(last)
                if last.slider_velocity.eq(point.slider_velocity)
                    && last.generate_ticks == point.generate_ticks => {}
            None if point == DifficultyPoint::default() => {}
            _ => {
                self.difficulty_points.push(point);
                self.last_difficulty_inherited = inherited;
            }
        }
    }

    fn parse_hit_object(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let mut split = line.split(',');

        let mut next = |field: &'static str| split.next().ok_or(ParseErrorKind::MissingField(field));

        let x = parse_f64(next("x")?, "x", MAX_COORDINATE_VALUE)?;
        let y = parse_f64(next("y")?, "y", MAX_COORDINATE_VALUE)?;
        let pos = Pos::new(x as i32 as f32, y as i32 as f32);

        let start_time = parse_f64(next("time")?, "time", MAX_PARSE_VALUE)? + self.offset;
        let kind_bits = parse_i32(next("type")?, "type")?;
        let sound = HitSoundType::from(parse_i32(next("hitsound")?, "hitsound")? as u8);

        let kind = if kind_bits & CIRCLE_FLAG != 0 {
            HitObjectKind::Circle
        } else if kind_bits & SLIDER_FLAG != 0 {
            let path = next("slider path")?;
            let repeats = parse_i32(next("repeats")?, "repeats")?;

            if repeats > MAX_REPEATS {
                return Err(ParseErrorKind::TooManyRepeats(repeats));
            }

            let repeats = (repeats.max(1) - 1) as usize;

            let expected_dist = match split.next() {
                Some(s) => Some(parse_f64(s, "length", MAX_COORDINATE_VALUE)?.max(0.0))
                    .filter(|&len| len > 0.0),
                None => None,
            };

            let node_count = repeats + 2;
            let mut node_sounds = vec![sound; node_count];

            if let Some(sounds) = split.next() {
                for (node, s) in node_sounds.iter_mut().zip(sounds.split('|')) {
                    *node = HitSoundType::from(parse_i32(s, "edge sounds")? as u8);
                }
            }

            HitObjectKind::Slider(Slider {
                expected_dist,
                repeats,
                control_points: parse_path(path, pos)?.into_boxed_slice(),
                node_sounds: node_sounds.into_boxed_slice(),
            })
        } else if kind_bits & SPINNER_FLAG != 0 {
            let end_time = parse_f64(next("end time")?, "end time", MAX_PARSE_VALUE)? + self.offset;

            HitObjectKind::Spinner(Spinner {
                duration: end_time.max(start_time) - start_time,
            })
        } else if kind_bits & HOLD_FLAG != 0 {
            let end_time = match split.next().and_then(|s| s.split(':').next()) {
                Some(s) => parse_f64(s, "end time", MAX_PARSE_VALUE)? + self.offset,
                None => start_time,
            };

            HitObjectKind::Hold(HoldNote {
                duration: end_time.max(start_time) - start_time,
            })
        } else {
            return Err(ParseErrorKind::UnknownHitObjectType(kind_bits));
        };

        let h = HitObject {
            pos,
            start_time,
            kind,
        };

        self.hit_objects.push((h, sound));

        Ok(())
    }

    fn finish(self) -> Beatmap {
        let Self {
            version,
            offset: _,
            mode,
            stack_leniency,
            hp,
            cs,
            od,
            ar,
            slider_multiplier,
            slider_tick_rate,
            breaks,
            mut timing_points,
            mut difficulty_points,
            mut effect_points,
            last_difficulty_inherited: _,
            mut hit_objects,
        } = self;

        timing_points.sort_by(|a, b| a.time.total_cmp(&b.time));
        difficulty_points.sort_by(|a, b| a.time.total_cmp(&b.time));
        effect_points.sort_by(|a, b| a.time.total_cmp(&b.time));
        crate::util::sort_by_start_time(&mut hit_objects, |(h, _)| h.start_time);

        let (hit_objects, hit_sounds) = hit_objects.into_iter().unzip();

        Beatmap {
            version,
            is_convert: false,
            stack_leniency,
            mode,
            ar: clamp_attribute(ar.unwrap_or(od), 0.0, 10.0, "approach rate"),
            cs: clamp_attribute(cs, 0.0, 10.0, "circle size"),
            hp: clamp_attribute(hp, 0.0, 10.0, "drain rate"),
            od: clamp_attribute(od, 0.0, 10.0, "overall difficulty"),
            slider_multiplier: f64::from(clamp_attribute(
                slider_multiplier as f32,
                0.4,
                3.6,
                "slider multiplier",
            )),
            slider_tick_rate: f64::from(clamp_attribute(
                slider_tick_rate as f32,
                0.5,
                8.0,
                "slider tick rate",
            )),
            breaks,
            timing_points,
            difficulty_points,
            effect_points,
            hit_objects,
            hit_sounds,
        }
    }
}

/// Parse a slider path like `B|100:100|200:100` into control points relative
/// to the slider head.
fn parse_path(path: &str, head: Pos) -> Result<Vec<PathControlPoint>, ParseErrorKind> {
    let parts: Vec<_> = path.split('|').collect();
    let mut control_points = Vec::with_capacity(parts.len());

    let is_letter = |s: &str| s.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

    let mut start_idx = 0;
    let mut first = true;

    for end_idx in 1..parts.len() {
        if !is_letter(parts[end_idx]) {
            continue;
        }

        let end_point = parts.get(end_idx + 1).copied();
        parse_segment(&parts[start_idx..end_idx], end_point, first, head, &mut control_points)?;

        start_idx = end_idx;
        first = false;
    }

    if parts.len() > start_idx {
        parse_segment(&parts[start_idx..], None, first, head, &mut control_points)?;
    }

    Ok(control_points)
}

fn parse_segment(
    points: &[&str],
    end_point: Option<&str>,
    first: bool,
    head: Pos,
    control_points: &mut Vec<PathControlPoint>,
) -> Result<(), ParseErrorKind> {
    let code = points.first().copied().unwrap_or_default();

    let mut path_type = code
        .get(..1)
        .and_then(PathType::from_code)
        .ok_or_else(|| ParseErrorKind::InvalidPathType(code.to_owned()))?;

    let mut vertices = Vec::with_capacity(points.len() + 1);

    if first {
        vertices.push(PathControlPoint::default());
    }

    for point in points.iter().skip(1) {
        vertices.push(read_point(point, head)?);
    }

    let end_point_len = match end_point {
        Some(point) => {
            vertices.push(read_point(point, head)?);

            1
        }
        None => 0,
    };

    if vertices.is_empty() {
        return Ok(());
    }

    if path_type == PathType::PerfectCurve {
        if let [a, b, c] = vertices.as_slice() {
            if is_linear(a.pos, b.pos, c.pos) {
                path_type = PathType::Linear;
            }
        } else {
            path_type = PathType::Bezier;
        }
    }

    vertices[0].path_type = Some(path_type);

    // A doubled point in the middle of a segment starts a new segment
    let end = vertices.len() - end_point_len;
    let mut start_idx = 0;

    for end_idx in 1..end {
        if vertices[end_idx].pos != vertices[end_idx - 1].pos {
            continue;
        }

        if path_type == PathType::Catmull && end_idx > 1 {
            continue;
        }

        if end_idx == end - 1 {
            continue;
        }

        vertices[end_idx - 1].path_type = Some(path_type);
        control_points.extend_from_slice(&vertices[start_idx..end_idx]);
        start_idx = end_idx + 1;
    }

    if end > start_idx {
        control_points.extend_from_slice(&vertices[start_idx..end]);
    }

    Ok(())
}

fn read_point(value: &str, head: Pos) -> Result<PathControlPoint, ParseErrorKind> {
    let invalid = || ParseErrorKind::InvalidControlPoint(value.to_owned());

    let (x, y) = value.split_once(':').ok_or_else(invalid)?;

    let x = parse_f64(x, "control point", MAX_COORDINATE_VALUE).map_err(|_| invalid())?;
    let y = parse_f64(y, "control point", MAX_COORDINATE_VALUE).map_err(|_| invalid())?;

    let pos = Pos::new(x as i32 as f32, y as i32 as f32);

    Ok(PathControlPoint::new(pos - head))
}

fn is_linear(p0: Pos, p1: Pos, p2: Pos) -> bool {
    let lhs = (p1.y - p0.y) * (p2.x - p0.x);
    let rhs = (p1.x - p0.x) * (p2.y - p0.y);

    lhs.eq(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\u{feff}osu file format v14

[General]
Mode: 0
StackLeniency: 0.5

[Difficulty]
HPDrainRate:4
CircleSize:4.2
OverallDifficulty:8
ApproachRate:9.3
SliderMultiplier:1.8
SliderTickRate:1

[Events]
//Break Periods
2,5000,8000

[TimingPoints]
0,500,4,2,0,60,1,0
1000,-50,4,2,0,60,0,1

[HitObjects]
256,192,3000,1,0,0:0:0:0:
100,100,1000,2,0,B|200:100|200:200,2,250,2|0|8
256,192,6000,12,0,9000,0:0:0:0:
";

    #[test]
    fn parses_sections() {
        let map = decode(MAP).unwrap();

        assert_eq!(map.version, 14);
        assert_eq!(map.mode, GameMode::Osu);
        assert!((map.stack_leniency - 0.5).abs() < f32::EPSILON);
        assert!((map.ar - 9.3).abs() < f32::EPSILON);
        assert!((map.cs - 4.2).abs() < f32::EPSILON);
        assert!((map.slider_multiplier - 1.8).abs() < 1e-6);

        assert_eq!(map.breaks.len(), 1);
        assert_eq!(map.timing_points.len(), 1);
        assert_eq!(map.difficulty_points.len(), 1);
        assert!((map.difficulty_points[0].slider_velocity - 2.0).abs() < f64::EPSILON);
        assert_eq!(map.effect_points.len(), 1);
        assert!(map.effect_points[0].kiai);

        assert_eq!(map.hit_objects.len(), 3);
        assert_eq!(map.hit_sounds.len(), 3);
    }

    #[test]
    fn sorts_objects_and_keeps_sounds_aligned() {
        let map = decode(MAP).unwrap();

        let times: Vec<_> = map.hit_objects.iter().map(|h| h.start_time).collect();
        assert_eq!(times, [1000.0, 3000.0, 6000.0]);

        let HitObjectKind::Slider(ref slider) = map.hit_objects[0].kind else {
            panic!("expected slider");
        };

        assert_eq!(slider.repeats, 1);
        assert_eq!(slider.expected_dist, Some(250.0));
        assert_eq!(slider.control_points.len(), 3);
        assert_eq!(slider.control_points[0].path_type, Some(PathType::Bezier));
        assert_eq!(slider.control_points[1].pos, Pos::new(100.0, 0.0));
        assert_eq!(slider.node_sounds.len(), 3);
        assert!(slider.node_sounds[2].is_rim());

        let HitObjectKind::Spinner(spinner) = map.hit_objects[2].kind else {
            panic!("expected spinner");
        };

        assert!((spinner.duration - 3000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ar_defaults_to_od() {
        let map = decode("osu file format v7\n[Difficulty]\nOverallDifficulty:6\n").unwrap();

        assert!((map.ar - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn early_versions_are_offset() {
        let map = decode("osu file format v4\n[HitObjects]\n0,0,100,1,0\n").unwrap();

        assert!((map.hit_objects[0].start_time - 124.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_header() {
        let err = decode("not a beatmap\n").unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::IncorrectFileHeader);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_future_version() {
        let err = decode("osu file format v128\n").unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::UnsupportedVersion(128));
    }

    #[test]
    fn reports_location_of_bad_number() {
        let err = decode("osu file format v14\n\n[HitObjects]\n0,0,abc,1,0\n").unwrap_err();

        assert_eq!(err.line, 4);
        assert_eq!(err.section, Section::HitObjects);
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber { field: "time" });
    }

    #[test]
    fn rejects_invalid_mode_and_type() {
        let err = decode("osu file format v14\n[General]\nMode: 7\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidMode("7".to_owned()));

        let err = decode("osu file format v14\n[HitObjects]\n0,0,0,64,0\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownHitObjectType(64));
    }

    #[test]
    fn rejects_too_many_repeats() {
        let map = "osu file format v14\n[HitObjects]\n0,0,0,2,0,L|100:0,9001,100\n";
        let err = decode(map).unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::TooManyRepeats(9001));
    }

    #[test]
    fn missing_field() {
        let err = decode("osu file format v14\n[HitObjects]\n0,0\n").unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::MissingField("time"));
    }

    #[test]
    fn clamps_attributes() {
        let map = decode("osu file format v14\n[Difficulty]\nCircleSize:12\nSliderTickRate:20\n")
            .unwrap();

        assert!((map.cs - 10.0).abs() < f32::EPSILON);
        assert!((map.slider_tick_rate - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tolerates_crlf_and_comments() {
        let map = decode("osu file format v14\r\n// comment\r\n[HitObjects]\r\n1,2,3,1,0\r\n")
            .unwrap();

        assert_eq!(map.hit_objects.len(), 1);
        assert_eq!(map.hit_objects[0].pos, Pos::new(1.0, 2.0));
    }
}
