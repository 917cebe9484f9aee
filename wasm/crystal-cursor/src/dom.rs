//! DOM presenter: renders the cursor as absolutely positioned `div`s.
//!
//! Class names match the stylesheet shipped with the page (`#moonlight-cursor`,
//! `.crystal-trail`, `.crystal-burst`, `.shockwave`, `.ripple-effect`); only
//! geometry, opacity and colours are set inline.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::effects::{EffectFrame, EffectId, EffectKind, TransientEffect};
use crate::error::{CursorError, DomResultExt, Result};
use crate::geometry::Point;
use crate::presenter::{MarkerFlag, Presenter};
use crate::pulse::MarkerPulse;
use crate::trail::TrailParticle;

const MARKER_ID: &str = "moonlight-cursor";

const MARKER_PARTS: &str = r#"
    <div class="moon-disc"></div>
    <div class="moon-crescent"></div>
    <div class="moon-glow"></div>
    <div class="moon-rings">
        <div class="ring ring-1"></div>
        <div class="ring ring-2"></div>
        <div class="ring ring-3"></div>
    </div>
"#;

const SHARD_CLIP: &str = "polygon(50% 0%, 0% 100%, 100% 100%)";

pub struct DomPresenter {
    document: Document,
    body: HtmlElement,
    marker: Option<HtmlElement>,
    glow: Option<HtmlElement>,
    rings: Vec<HtmlElement>,
    trail: Vec<HtmlElement>,
    effects: HashMap<EffectId, HtmlElement>,
}

impl DomPresenter {
    /// Bind to `document`. Nothing is inserted until `mount`.
    pub fn new(document: Document) -> Result<Self> {
        let body = document.body().ok_or(CursorError::NoBody)?;
        Ok(Self {
            document,
            body,
            marker: None,
            glow: None,
            rings: Vec::new(),
            trail: Vec::new(),
            effects: HashMap::new(),
        })
    }

    fn create_div(&self, class: &str) -> Result<HtmlElement> {
        let element = self
            .document
            .create_element("div")
            .dom_context("create div")?
            .dyn_into::<HtmlElement>()
            .map_err(|e| CursorError::dom("cast div", e))?;
        element.set_class_name(class);
        Ok(element)
    }

    fn append(&self, element: &HtmlElement) -> Result<()> {
        self.body
            .append_child(element)
            .map(|_| ())
            .dom_context("append to body")
    }

    fn find_part(marker: &HtmlElement, selector: &str) -> Result<Option<HtmlElement>> {
        Ok(marker
            .query_selector(selector)
            .dom_context("query marker part")?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok()))
    }

    fn marker(&self) -> Result<&HtmlElement> {
        self.marker
            .as_ref()
            .ok_or_else(|| CursorError::dom("marker", "not mounted"))
    }

    fn trail_node(&self, index: usize) -> Result<&HtmlElement> {
        self.trail
            .get(index)
            .ok_or_else(|| CursorError::dom("trail", format!("no node at {}", index)))
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<()> {
    element
        .style()
        .set_property(property, value)
        .dom_context(property)
}

fn place(element: &HtmlElement, at: Point) -> Result<()> {
    set_style(element, "left", &format!("{}px", at.x))?;
    set_style(element, "top", &format!("{}px", at.y))
}

impl Presenter for DomPresenter {
    fn mount(&mut self, trail_count: usize) -> Result<()> {
        let marker = self.create_div(MarkerFlag::Hidden.class_name())?;
        marker.set_id(MARKER_ID);
        marker.set_inner_html(MARKER_PARTS);
        self.append(&marker)?;

        self.glow = Self::find_part(&marker, ".moon-glow")?;
        self.rings = ["ring-1", "ring-2", "ring-3"]
            .iter()
            .filter_map(|ring| Self::find_part(&marker, &format!(".{}", ring)).transpose())
            .collect::<Result<Vec<_>>>()?;
        self.marker = Some(marker);

        for i in 0..trail_count {
            let node = self.create_div("crystal-trail")?;
            set_style(&node, "--i", &i.to_string())?;
            self.append(&node)?;
            self.trail.push(node);
        }
        Ok(())
    }

    fn move_marker(&mut self, top_left: Point) -> Result<()> {
        place(self.marker()?, top_left)
    }

    fn set_marker_flag(&mut self, flag: MarkerFlag, on: bool) -> Result<()> {
        self.marker()?
            .class_list()
            .toggle_with_force(flag.class_name(), on)
            .map(|_| ())
            .dom_context("toggle marker class")
    }

    fn set_marker_pulse(&mut self, pulse: &MarkerPulse) -> Result<()> {
        if let Some(glow) = &self.glow {
            set_style(glow, "opacity", &pulse.glow.to_string())?;
        }
        for (ring, scale) in self.rings.iter().zip(pulse.ring_scales) {
            set_style(
                ring,
                "transform",
                &format!("translate(-50%, -50%) scale({})", scale),
            )?;
        }
        Ok(())
    }

    fn activate_trail(&mut self, index: usize, particle: &TrailParticle) -> Result<()> {
        let node = self.trail_node(index)?;
        let (head, tail) = particle.gradient_hues();
        set_style(node, "width", &format!("{}px", particle.size))?;
        set_style(node, "height", &format!("{}px", particle.size * 1.5))?;
        set_style(node, "opacity", &particle.opacity().to_string())?;
        set_style(node, "border-radius", "50%")?;
        set_style(
            node,
            "transform",
            &format!("translate(-50%, -50%) rotate({}rad)", particle.rotation()),
        )?;
        set_style(
            node,
            "background",
            &format!(
                "linear-gradient(to bottom, hsla({}, 100%, 70%, 0.9), hsla({}, 100%, 50%, 0.5))",
                head, tail
            ),
        )?;
        set_style(
            node,
            "box-shadow",
            &format!("0 0 5px hsla({}, 100%, 70%, 0.8)", head),
        )
    }

    fn update_trail(&mut self, index: usize, particle: &TrailParticle) -> Result<()> {
        let node = self.trail_node(index)?;
        place(node, particle.position)?;
        set_style(node, "opacity", &particle.opacity().to_string())?;
        set_style(
            node,
            "height",
            &format!("{}px", particle.size * particle.tail_length()),
        )
    }

    fn spawn_effect(&mut self, effect: &TransientEffect) -> Result<()> {
        let node = self.create_div(effect.kind.name())?;
        place(&node, effect.origin)?;
        if let EffectKind::CrystalShard(shard) = &effect.kind {
            set_style(&node, "background-color", &shard.color)?;
            set_style(&node, "width", &format!("{}px", shard.size))?;
            set_style(&node, "height", &format!("{}px", shard.size))?;
            set_style(
                &node,
                "transform",
                &format!("rotate({}deg)", shard.rotation_deg),
            )?;
            set_style(&node, "clip-path", SHARD_CLIP)?;
        }
        self.append(&node)?;
        self.effects.insert(effect.id, node);
        Ok(())
    }

    fn update_effect(&mut self, id: EffectId, frame: &EffectFrame) -> Result<()> {
        let Some(node) = self.effects.get(&id) else {
            return Ok(());
        };
        match *frame {
            EffectFrame::Shard {
                offset,
                opacity,
                scale,
                rotation_deg,
            } => {
                set_style(
                    node,
                    "transform",
                    &format!(
                        "translate({}px, {}px) rotate({}deg) scale({})",
                        offset.x, offset.y, rotation_deg, scale
                    ),
                )?;
                set_style(node, "opacity", &opacity.to_string())
            }
            EffectFrame::Shockwave {
                radius,
                opacity,
                border_width,
            } => {
                set_style(node, "width", &format!("{}px", radius))?;
                set_style(node, "height", &format!("{}px", radius))?;
                set_style(node, "opacity", &opacity.to_string())?;
                set_style(node, "border-width", &format!("{}px", border_width))
            }
        }
    }

    fn remove_effect(&mut self, id: EffectId) -> Result<()> {
        if let Some(node) = self.effects.remove(&id) {
            node.remove();
        }
        Ok(())
    }

    fn set_pointer_glyph(&mut self, glyph: Option<&str>) -> Result<()> {
        let style = self.body.style();
        match glyph {
            Some(glyph) => style.set_property("cursor", glyph).dom_context("set cursor"),
            None => style
                .remove_property("cursor")
                .map(|_| ())
                .dom_context("clear cursor"),
        }
    }

    fn unmount(&mut self) -> Result<()> {
        if let Some(marker) = self.marker.take() {
            marker.remove();
        }
        self.glow = None;
        self.rings.clear();
        for node in self.trail.drain(..) {
            node.remove();
        }
        for (_, node) in self.effects.drain() {
            node.remove();
        }
        Ok(())
    }
}
