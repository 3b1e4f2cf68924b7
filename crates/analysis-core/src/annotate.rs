//! Feedback text for key frames.
//!
//! A small decision tree keyed on the frame kind and the metric values at
//! the selected moment. Templates are deterministic: identical inputs
//! produce identical text.

use podium_session_model::frame::{FacialFrame, PostureFrame};
use podium_session_model::keyframe::KeyFrameKind;

/// Metric context for the selected moment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationContext {
    pub facial: Option<FacialFrame>,
    pub posture: Option<PostureFrame>,
}

/// Produce the feedback annotation for a key frame.
pub fn annotation_for(kind: KeyFrameKind, ctx: &AnnotationContext) -> String {
    match kind {
        KeyFrameKind::BestFacial => best_facial(ctx),
        KeyFrameKind::BestOverall => best_overall(ctx),
        KeyFrameKind::ImproveFacial => improve_facial(ctx),
        KeyFrameKind::ImprovePosture => improve_posture(ctx),
        KeyFrameKind::ImproveEyeContact => {
            "Your gaze drifts away from the camera here. Returning to the lens at key points \
             keeps your audience connected."
                .to_string()
        }
        KeyFrameKind::AverageMoment => {
            "A representative moment from your presentation. Compare it with the highlighted \
             frames to see what changes between your strongest and weakest stretches."
                .to_string()
        }
    }
}

fn best_facial(ctx: &AnnotationContext) -> String {
    let Some(f) = ctx.facial else {
        return "Your strongest facial moment of the talk.".to_string();
    };
    if f.smiling && f.engagement > 0.7 {
        "Excellent energy here — your smile and engagement make this moment land. Aim to open \
         and close your talk with this presence."
            .to_string()
    } else if f.smiling {
        "A warm, natural smile at this moment. Pairing it with more animated delivery would \
         make it even stronger."
            .to_string()
    } else {
        "Your most expressive moment. Bringing a smile into stretches like this one would lift \
         the whole talk."
            .to_string()
    }
}

fn best_overall(ctx: &AnnotationContext) -> String {
    let confident_posture = ctx.posture.map(|p| p.confidence > 0.6).unwrap_or(false);
    if confident_posture {
        "Your expression and posture come together here — engaged face, confident stance. This \
         is the presence to hold throughout."
            .to_string()
    } else {
        "Your strongest combined moment. Your expression carries it; straightening your stance \
         would complete the picture."
            .to_string()
    }
}

fn improve_facial(ctx: &AnnotationContext) -> String {
    let Some(f) = ctx.facial else {
        return "Your expression flattens at this moment.".to_string();
    };
    if !f.smiling && f.engagement < 0.3 {
        "Your expression goes flat here and engagement drops. Try marking transitions in your \
         material with a deliberate change of expression."
            .to_string()
    } else if !f.smiling {
        "No smile at this moment. Even a brief one while making a point reads as confidence on \
         camera."
            .to_string()
    } else {
        "Expressiveness dips here. Varying your facial delivery keeps longer segments from \
         feeling monotone."
            .to_string()
    }
}

fn improve_posture(ctx: &AnnotationContext) -> String {
    let confidence = ctx.posture.map(|p| p.confidence).unwrap_or(0.0);
    if confidence < 0.3 {
        "Your posture collapses noticeably here. Plant your feet shoulder-width apart and keep \
         your shoulders back to project confidence."
            .to_string()
    } else if confidence < 0.6 {
        "Your stance weakens at this moment. A small reset — shoulders back, weight balanced — \
         restores a confident silhouette."
            .to_string()
    } else {
        "Posture dips slightly here relative to the rest of your talk. A quick check of your \
         stance at section breaks helps."
            .to_string()
    }
}
