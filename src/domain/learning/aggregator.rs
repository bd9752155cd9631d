//! Progress aggregator.
//!
//! Derives the progress report for one student in one course from the course
//! tree and the set of lesson ids the student has completed. Every read and
//! write of course progress goes through [`aggregate`].

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, LessonId, ModuleId, Percentage};

/// Progress within a single module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleProgress {
    pub module_id: ModuleId,
    pub title: String,
    pub total_lessons: usize,
    pub completed_count: usize,
    pub percentage: Percentage,
}

/// The lesson a student should take next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextLesson {
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
    pub title: String,
}

/// Snapshot of a student's progress through a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub course_id: CourseId,
    pub total_lessons: usize,
    pub completed_count: usize,
    pub percentage: Percentage,
    pub modules: Vec<ModuleProgress>,
    pub next_lesson: Option<NextLesson>,
}

impl ProgressReport {
    pub fn is_complete(&self) -> bool {
        self.percentage.is_complete()
    }
}

/// Computes the progress report for `course` given completed lesson ids.
///
/// Ids that are not in the course tree are ignored, as are repeats, so
/// `completed_count <= total_lessons` always holds.
pub fn aggregate(course: &Course, completed: &[LessonId]) -> ProgressReport {
    let completed: HashSet<&LessonId> = completed.iter().collect();

    let mut total_lessons = 0;
    let mut completed_count = 0;
    let mut next_lesson = None;
    let mut modules = Vec::with_capacity(course.modules.len());

    for module in &course.modules {
        let mut module_done = 0;
        for lesson in &module.lessons {
            if completed.contains(&lesson.id) {
                module_done += 1;
            } else if next_lesson.is_none() {
                next_lesson = Some(NextLesson {
                    module_id: module.id,
                    lesson_id: lesson.id,
                    title: lesson.content.title.clone(),
                });
            }
        }
        let module_total = module.lessons.len();
        total_lessons += module_total;
        completed_count += module_done;
        modules.push(ModuleProgress {
            module_id: module.id,
            title: module.title.clone(),
            total_lessons: module_total,
            completed_count: module_done,
            percentage: Percentage::from_ratio(module_done, module_total),
        });
    }

    ProgressReport {
        course_id: course.id,
        total_lessons,
        completed_count,
        percentage: Percentage::from_ratio(completed_count, total_lessons),
        modules,
        next_lesson,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::test_support::course_with_modules;
    use proptest::prelude::*;

    fn lesson_ids(course: &Course) -> Vec<LessonId> {
        course.lessons().map(|(_, l)| l.id).collect()
    }

    // ══════════════════════════════════════════════════════════════
    // Examples
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn empty_course_is_zero_with_no_next_lesson() {
        let course = course_with_modules(&[]);
        let report = aggregate(&course, &[]);

        assert_eq!(report.total_lessons, 0);
        assert_eq!(report.percentage, Percentage::ZERO);
        assert!(report.next_lesson.is_none());
        assert!(report.modules.is_empty());
    }

    #[test]
    fn module_without_lessons_reports_zero() {
        let course = course_with_modules(&[0, 2]);
        let report = aggregate(&course, &[]);

        assert_eq!(report.modules[0].percentage, Percentage::ZERO);
        assert_eq!(report.modules[0].total_lessons, 0);
        assert_eq!(report.next_lesson.unwrap().module_id, course.modules[1].id);
    }

    #[test]
    fn partial_completion_rounds_half_up() {
        // 8 lessons, 1 done -> 12.5% -> 13
        let course = course_with_modules(&[4, 4]);
        let ids = lesson_ids(&course);
        let report = aggregate(&course, &ids[..1]);

        assert_eq!(report.completed_count, 1);
        assert_eq!(report.percentage.value(), 13);
        assert_eq!(report.modules[0].percentage.value(), 25);
        assert_eq!(report.modules[1].percentage.value(), 0);
    }

    #[test]
    fn next_lesson_skips_completed_out_of_order() {
        let course = course_with_modules(&[3]);
        let ids = lesson_ids(&course);
        // second and third done, first still open
        let report = aggregate(&course, &[ids[1], ids[2]]);

        assert_eq!(report.next_lesson.unwrap().lesson_id, ids[0]);
    }

    #[test]
    fn unknown_and_duplicate_ids_are_ignored() {
        let course = course_with_modules(&[2]);
        let ids = lesson_ids(&course);
        let report = aggregate(&course, &[ids[0], ids[0], LessonId::new()]);

        assert_eq!(report.completed_count, 1);
        assert_eq!(report.percentage.value(), 50);
    }

    #[test]
    fn all_completed_is_hundred_with_no_next() {
        let course = course_with_modules(&[2, 3]);
        let report = aggregate(&course, &lesson_ids(&course));

        assert!(report.is_complete());
        assert!(report.next_lesson.is_none());
        assert!(report.modules.iter().all(|m| m.percentage.is_complete()));
    }

    // ══════════════════════════════════════════════════════════════
    // Properties
    // ══════════════════════════════════════════════════════════════

    fn tree_and_selection() -> impl Strategy<Value = (Vec<usize>, Vec<bool>, usize)> {
        prop::collection::vec(0usize..6, 0..6).prop_flat_map(|sizes| {
            let total: usize = sizes.iter().sum();
            (
                Just(sizes),
                prop::collection::vec(any::<bool>(), total),
                0usize..3,
            )
        })
    }

    proptest! {
        #[test]
        fn percentage_is_rounded_ratio_and_hundred_iff_all_done(
            (sizes, picks, strangers) in tree_and_selection()
        ) {
            let course = course_with_modules(&sizes);
            let ids = lesson_ids(&course);
            let mut completed: Vec<LessonId> = ids
                .iter()
                .zip(&picks)
                .filter(|(_, p)| **p)
                .map(|(id, _)| *id)
                .collect();
            let k = completed.len();
            let n = ids.len();
            // repeats and foreign ids must not count
            if let Some(first) = completed.first().copied() {
                completed.push(first);
            }
            completed.extend((0..strangers).map(|_| LessonId::new()));

            let report = aggregate(&course, &completed);

            prop_assert_eq!(report.completed_count, k);
            prop_assert_eq!(report.total_lessons, n);
            let expected = if n == 0 { 0 } else { ((200 * k + n) / (2 * n)) as u8 };
            prop_assert_eq!(report.percentage.value(), expected.min(if k < n { 99 } else { 100 }));
            prop_assert_eq!(report.percentage.is_complete(), n > 0 && k == n);
        }

        #[test]
        fn next_lesson_is_first_incomplete_in_tree_order(
            (sizes, picks, _) in tree_and_selection()
        ) {
            let course = course_with_modules(&sizes);
            let ids = lesson_ids(&course);
            let completed: Vec<LessonId> = ids
                .iter()
                .zip(&picks)
                .filter(|(_, p)| **p)
                .map(|(id, _)| *id)
                .collect();

            let report = aggregate(&course, &completed);

            let expected = ids.iter().zip(&picks).find(|(_, p)| !**p).map(|(id, _)| *id);
            prop_assert_eq!(report.next_lesson.map(|n| n.lesson_id), expected);
            prop_assert_eq!(expected.is_none(), completed.len() == ids.len());
        }
    }
}
