use super::toast::ToastKind;
use super::utils::first_image_file;
use super::{classification_demo, detection_demo, search_demo, segmentation_demo, upload_section};
use crate::api::{CreditsCallback, GlooTransport, LocalStorageTokens};
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{
    BoundingBox, DemoController, DemoError, DemoResult, HttpReply, Modality, Size, Taxonomy,
    Transport, TransportError, Uuid, VisionConfig,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlImageElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct DemoPanelProps {
    pub modality: Modality,
    pub config: Rc<VisionConfig>,
    pub user_id: Option<String>,
    pub on_credits: Callback<String>,
    pub on_notify: Callback<(ToastKind, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTab {
    Text,
    Image,
    Combined,
}

pub enum PanelMsg {
    // Image input
    ImageSelected(GlooFile),
    ImageRejected,
    RemoveImage,
    SetDragging(bool),
    HandleDrop(DragEvent),

    // Search / classify input
    SetText(String),
    SetTab(SearchTab),
    SetWeighting(u8),
    SetLabelDraft(String),
    AddLabel,
    RemoveLabel(String),

    // Call lifecycle
    Submit,
    Completed(Uuid, Result<HttpReply, TransportError>),

    // Result rendering
    PreviewResized,
    CropsReady(u64, Vec<Option<String>>),
    DownloadMask(Taxonomy),
}

/// Body of the demo modal. One instance per opened modal, so closing the
/// modal drops the controller and its result.
pub struct DemoPanel {
    pub controller: DemoController<GlooFile>,
    pub preview_url: Option<ObjectUrl>,
    pub is_dragging: bool,
    pub search_tab: SearchTab,
    pub label_draft: String,
    pub preview_ref: NodeRef,
    pub natural_size: Option<Size>,
    pub displayed_size: Option<Size>,
    pub crops: Vec<Option<String>>,
    image_generation: u64,
    _resize_listener: Option<EventListener>,
}

impl Component for DemoPanel {
    type Message = PanelMsg;
    type Properties = DemoPanelProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let resize_listener = web_sys::window().map(|window| {
            EventListener::new(&window, "resize", move |_| {
                link.send_message(PanelMsg::PreviewResized)
            })
        });

        Self {
            controller: DemoController::new(ctx.props().modality),
            preview_url: None,
            is_dragging: false,
            search_tab: SearchTab::Combined,
            label_draft: String::new(),
            preview_ref: NodeRef::default(),
            natural_size: None,
            displayed_size: None,
            crops: Vec::new(),
            image_generation: 0,
            _resize_listener: resize_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Image input
            PanelMsg::ImageSelected(file) => self.handle_image_selected(ctx, file),
            PanelMsg::ImageRejected => {
                self.notify(ctx, ToastKind::Error, "Please choose an image file (JPG, PNG, WEBP).");
                false
            }
            PanelMsg::RemoveImage => self.handle_remove_image(),
            PanelMsg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            PanelMsg::HandleDrop(event) => self.handle_drop(ctx, event),

            // Search / classify input
            PanelMsg::SetText(text) => {
                self.controller.set_text(text);
                true
            }
            PanelMsg::SetTab(tab) => self.handle_set_tab(tab),
            PanelMsg::SetWeighting(weighting) => {
                self.controller.set_weighting(weighting);
                true
            }
            PanelMsg::SetLabelDraft(draft) => {
                self.label_draft = draft;
                true
            }
            PanelMsg::AddLabel => self.handle_add_label(),
            PanelMsg::RemoveLabel(label) => self.controller.remove_label(&label),

            // Call lifecycle
            PanelMsg::Submit => self.handle_submit(ctx),
            PanelMsg::Completed(request_id, outcome) => {
                self.handle_completed(ctx, request_id, outcome)
            }

            // Result rendering
            PanelMsg::PreviewResized => self.handle_preview_resized(),
            PanelMsg::CropsReady(generation, crops) => {
                if generation != self.image_generation {
                    return false;
                }
                self.crops = crops;
                true
            }
            PanelMsg::DownloadMask(taxonomy) => {
                self.handle_download_mask(ctx, taxonomy);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let modality = ctx.props().modality;

        html! {
            <div class="demo-panel">
                {
                    match modality {
                        Modality::Search => search_demo::render_search_inputs(self, ctx),
                        Modality::Classify => html! {
                            <>
                                { upload_section::render_image_picker(self, ctx) }
                                { classification_demo::render_label_editor(self, ctx) }
                            </>
                        },
                        Modality::Segment | Modality::Detect => {
                            upload_section::render_image_picker(self, ctx)
                        }
                    }
                }
                { self.render_submit_button(ctx) }
                { self.render_result(ctx) }
            </div>
        }
    }
}

// Handler methods
impl DemoPanel {
    fn notify(&self, ctx: &Context<Self>, kind: ToastKind, message: impl Into<String>) {
        ctx.props().on_notify.emit((kind, message.into()));
    }

    fn handle_image_selected(&mut self, ctx: &Context<Self>, file: GlooFile) -> bool {
        log::info!("image selected for {}: {}", ctx.props().modality, file.name());
        self.reset_image_state();
        self.preview_url = Some(ObjectUrl::from(file.clone()));
        self.controller.select_image(file);
        self.notify(ctx, ToastKind::Success, "Image uploaded");
        true
    }

    fn handle_remove_image(&mut self) -> bool {
        self.reset_image_state();
        self.controller.clear_image();
        true
    }

    fn reset_image_state(&mut self) {
        self.image_generation += 1;
        self.preview_url = None;
        self.natural_size = None;
        self.displayed_size = None;
        self.crops.clear();
    }

    fn handle_drop(&mut self, ctx: &Context<Self>, event: DragEvent) -> bool {
        event.prevent_default();
        self.is_dragging = false;

        let file = event
            .data_transfer()
            .and_then(|data_transfer| data_transfer.files())
            .and_then(|file_list| first_image_file(&file_list));
        match file {
            Some(file) => self.handle_image_selected(ctx, file),
            None => {
                log::warn!("drop ignored: no image file");
                ctx.link().send_message(PanelMsg::ImageRejected);
                true
            }
        }
    }

    // Each tab only keeps the inputs it shows, so what is sent always
    // matches what is on screen.
    fn handle_set_tab(&mut self, tab: SearchTab) -> bool {
        if self.search_tab == tab {
            return false;
        }
        self.search_tab = tab;
        match tab {
            SearchTab::Text => {
                if self.controller.input().image.is_some() {
                    self.handle_remove_image();
                }
            }
            SearchTab::Image => self.controller.set_text(""),
            SearchTab::Combined => {}
        }
        true
    }

    fn handle_add_label(&mut self) -> bool {
        let draft = std::mem::take(&mut self.label_draft);
        if !self.controller.add_label(&draft) {
            log::debug!("label {:?} ignored (empty or duplicate)", draft);
        }
        true
    }

    fn handle_submit(&mut self, ctx: &Context<Self>) -> bool {
        let props = ctx.props();
        match self.controller.begin(&props.config, &LocalStorageTokens) {
            Ok(submission) => {
                let link = ctx.link().clone();
                spawn_local(async move {
                    let outcome = GlooTransport.post(&submission).await;
                    link.send_message(PanelMsg::Completed(submission.request_id, outcome));
                });
                true
            }
            Err(DemoError::Busy) => false,
            Err(e) => {
                self.notify(ctx, ToastKind::Error, e.user_message());
                true
            }
        }
    }

    fn handle_completed(
        &mut self,
        ctx: &Context<Self>,
        request_id: Uuid,
        outcome: Result<HttpReply, TransportError>,
    ) -> bool {
        let props = ctx.props();
        let credits = CreditsCallback(props.on_credits.clone());
        let detected_boxes = match self
            .controller
            .complete(request_id, outcome, props.user_id.as_deref(), &credits)
        {
            Ok(result) => {
                let boxes: Option<Vec<BoundingBox>> = match result {
                    DemoResult::Detect(detect) => {
                        Some(detect.detected_objects.iter().map(|o| o.bbox).collect())
                    }
                    _ => None,
                };
                props.on_notify.emit((
                    ToastKind::Success,
                    props.modality.done_message().to_string(),
                ));
                boxes
            }
            // The visitor already moved on to another image.
            Err(DemoError::Superseded) => None,
            Err(e) => {
                props.on_notify.emit((ToastKind::Error, e.user_message()));
                None
            }
        };

        if let Some(boxes) = detected_boxes {
            self.crops.clear();
            self.start_crops(ctx, boxes);
            self.handle_preview_resized();
        }
        true
    }

    fn start_crops(&self, ctx: &Context<Self>, boxes: Vec<BoundingBox>) {
        let Some(src) = self.preview_url.as_ref().map(|url| url.to_string()) else {
            return;
        };
        let generation = self.image_generation;
        let link = ctx.link().clone();
        spawn_local(async move {
            match detection_demo::crop_thumbnails(src, boxes).await {
                Ok(crops) => link.send_message(PanelMsg::CropsReady(generation, crops)),
                Err(e) => log::error!("failed to build crop thumbnails: {:?}", e),
            }
        });
    }

    fn handle_preview_resized(&mut self) -> bool {
        let Some(image) = self.preview_ref.cast::<HtmlImageElement>() else {
            return false;
        };
        self.natural_size = Some(Size::new(
            f64::from(image.natural_width()),
            f64::from(image.natural_height()),
        ));
        self.displayed_size = Some(Size::new(
            f64::from(image.client_width()),
            f64::from(image.client_height()),
        ));
        true
    }

    fn handle_download_mask(&self, ctx: &Context<Self>, taxonomy: Taxonomy) {
        let Some(DemoResult::Segment(result)) = self.controller.result() else {
            return;
        };
        if let Err(e) = segmentation_demo::download_mask(result, taxonomy) {
            log::error!("mask download failed: {}", e);
            self.notify(ctx, ToastKind::Error, "Could not download the mask.");
        }
    }
}

// Rendering methods
impl DemoPanel {
    fn render_submit_button(&self, ctx: &Context<Self>) -> Html {
        let modality = ctx.props().modality;
        let busy = self.controller.is_busy();
        let hint = (modality.requires_image() && self.controller.input().image.is_none())
            .then_some("Upload an image first");
        let caption = match modality {
            Modality::Search => " Search",
            Modality::Segment => " Segment",
            Modality::Classify => " Classify",
            Modality::Detect => " Detect objects",
        };

        html! {
            <div class="button-container">
                <button
                    class="analyze-btn"
                    disabled={busy}
                    title={hint}
                    onclick={ctx.link().callback(|_| PanelMsg::Submit)}
                >
                    {
                        if busy {
                            html! { <><i class="fa-solid fa-spinner fa-spin"></i>{ format!(" {}", modality.progress_label()) }</> }
                        } else {
                            html! { <><i class="fa-solid fa-wand-magic-sparkles"></i>{ caption }</> }
                        }
                    }
                </button>
            </div>
        }
    }

    fn render_result(&self, ctx: &Context<Self>) -> Html {
        match self.controller.result() {
            Some(DemoResult::Search(result)) => {
                search_demo::render_search_results(result, &ctx.props().config)
            }
            Some(DemoResult::Classify(result)) => classification_demo::render_classification(result),
            Some(DemoResult::Segment(result)) => {
                segmentation_demo::render_segmentation(self, result, ctx)
            }
            Some(DemoResult::Detect(result)) => detection_demo::render_crops(self, result),
            None => html! {},
        }
    }
}
