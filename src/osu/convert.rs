use crate::model::{beatmap::Beatmap, pos::Pos};

use super::{
    attributes::OsuDifficultyAttributes,
    difficulty::scaling_factor::ScalingFactor,
    object::{NestedSliderObjectKind, OsuObject, OsuObjectKind},
};

const STACK_DISTANCE: f32 = 3.0;

/// Turn the first `take` hit objects into [`OsuObject`]s, apply hardrock
/// and stacking, and count objects and combo into `attrs`.
pub fn convert_objects(
    map: &Beatmap,
    scaling_factor: &ScalingFactor,
    hr: bool,
    time_preempt: f64,
    take: usize,
    attrs: &mut OsuDifficultyAttributes,
) -> Vec<OsuObject> {
    let mut objects: Vec<_> = map
        .hit_objects
        .iter()
        .take(take)
        .map(|h| OsuObject::new(h, map))
        .collect();

    for h in objects.iter_mut() {
        count(attrs, h);

        if hr {
            h.reflect_vertically();
        }
    }

    let stack_threshold = time_preempt * f64::from(map.stack_leniency);

    if map.version >= 6 {
        stack(&mut objects, stack_threshold);
    } else {
        stack_legacy(&mut objects, stack_threshold);
    }

    for h in objects.iter_mut() {
        h.stack_offset = scaling_factor.stack_offset(h.stack_height);

        if let OsuObjectKind::Slider(ref mut slider) = h.kind {
            slider.lazy_end_pos += h.pos + h.stack_offset;
        }
    }

    objects
}

fn count(attrs: &mut OsuDifficultyAttributes, h: &OsuObject) {
    let combo = match h.kind {
        OsuObjectKind::Circle => {
            attrs.n_circles += 1;

            1
        }
        OsuObjectKind::Slider(ref slider) => {
            attrs.n_sliders += 1;

            1 + slider.nested_objects.len() as u32
        }
        OsuObjectKind::Spinner { .. } => {
            attrs.n_spinners += 1;

            1
        }
    };

    attrs.max_combo += combo;
}

fn close(a: Pos, b: Pos) -> bool {
    a.distance(b) < STACK_DISTANCE
}

/// Stack heights for file format v6 and later, assigned from the last object
/// backwards.
fn stack(objects: &mut [OsuObject], threshold: f64) {
    let mut extended_start = 0;

    for i in (1..objects.len()).rev() {
        // Interwoven stacks leave unstacked notes behind, check all of them
        let h = &objects[i];

        if h.stack_height != 0 || h.is_spinner() {
            continue;
        }

        if h.is_circle() {
            stack_onto_circle(objects, i, threshold, &mut extended_start);
        } else if h.is_slider() {
            stack_onto_slider(objects, i, threshold);
        }
    }
}

fn stack_onto_circle(objects: &mut [OsuObject], i: usize, threshold: f64, extended_start: &mut usize) {
    let mut top = i;

    for n in (0..i).rev() {
        if objects[n].is_spinner() {
            continue;
        }

        if objects[top].start_time - objects[n].end_time() > threshold {
            break;
        }

        if n < *extended_start {
            objects[n].stack_height = 0;
            *extended_start = n;
        }

        // Circles under the end of the last slider in a stack move down and
        // right instead
        let slider_end = objects[n].end_pos();

        if objects[n].is_slider() && close(slider_end, objects[top].pos) {
            let offset = objects[top].stack_height - objects[n].stack_height + 1;

            for h in objects[n + 1..=i].iter_mut() {
                if close(slider_end, h.pos) {
                    h.stack_height -= offset;
                }
            }

            // The slider itself gets its turn later
            break;
        }

        if close(objects[n].pos, objects[top].pos) {
            objects[n].stack_height = objects[top].stack_height + 1;
            top = n;
        }
    }
}

/// From the first slider of a stack on, stacking is always positive.
fn stack_onto_slider(objects: &mut [OsuObject], i: usize, threshold: f64) {
    let mut top = i;

    for n in (0..i).rev() {
        if objects[n].is_spinner() {
            continue;
        }

        if objects[top].start_time - objects[n].start_time > threshold {
            break;
        }

        if close(objects[n].end_pos(), objects[top].pos) {
            objects[n].stack_height = objects[top].stack_height + 1;
            top = n;
        }
    }
}

/// Stack heights for maps before file format v6.
fn stack_legacy(objects: &mut [OsuObject], threshold: f64) {
    for i in 0..objects.len() {
        if objects[i].stack_height != 0 && !objects[i].is_slider() {
            continue;
        }

        let pos = objects[i].pos;
        let path_end = legacy_path_end(&objects[i]);
        let mut stack_end_time = objects[i].end_time();
        let mut slider_stack = 0;

        for j in i + 1..objects.len() {
            if objects[j].start_time - threshold > stack_end_time {
                break;
            }

            // Later objects extend the stack by their start time
            if close(objects[j].pos, pos) {
                objects[i].stack_height += 1;
                stack_end_time = objects[j].start_time;
            } else if close(objects[j].pos, path_end) {
                slider_stack += 1;
                objects[j].stack_height -= slider_stack;
                stack_end_time = objects[j].start_time;
            }
        }
    }
}

/// Old maps consider a slider's path to end at its first repeat when the
/// repeat count is odd.
fn legacy_path_end(h: &OsuObject) -> Pos {
    let OsuObjectKind::Slider(ref slider) = h.kind else {
        return h.pos;
    };

    let end = if slider.repeat_count() % 2 == 0 {
        slider.tail()
    } else {
        slider
            .nested_objects
            .iter()
            .find(|nested| nested.kind == NestedSliderObjectKind::Repeat)
    };

    end.map_or(h.pos, |nested| nested.pos)
}

#[cfg(test)]
mod tests {
    use crate::Beatmap;

    use super::*;

    const STACK: &str = "osu file format v14

[General]
StackLeniency: 0.7

[Difficulty]
CircleSize:4
ApproachRate:9

[TimingPoints]
0,500,4,2,0,100,1,0

[HitObjects]
256,192,1000,1,0
256,192,1100,1,0
256,192,1200,1,0
100,100,3000,1,0
";

    #[test]
    fn stacked_circles() {
        let map: Beatmap = STACK.parse().unwrap();
        let scaling_factor = ScalingFactor::new(4.0);
        let mut attrs = OsuDifficultyAttributes::default();

        let objects = convert_objects(&map, &scaling_factor, false, 600.0, usize::MAX, &mut attrs);

        let heights: Vec<_> = objects.iter().map(|h| h.stack_height).collect();
        assert_eq!(heights, [2, 1, 0, 0]);
        assert!(objects[0].stacked_pos().x < objects[2].stacked_pos().x);
        assert_eq!(attrs.n_circles, 4);
        assert_eq!(attrs.max_combo, 4);
    }

    #[test]
    fn passed_objects_are_respected() {
        let map: Beatmap = STACK.parse().unwrap();
        let scaling_factor = ScalingFactor::new(4.0);
        let mut attrs = OsuDifficultyAttributes::default();

        let objects = convert_objects(&map, &scaling_factor, false, 600.0, 2, &mut attrs);

        assert_eq!(objects.len(), 2);
        assert_eq!(attrs.max_combo, 2);
    }
}
